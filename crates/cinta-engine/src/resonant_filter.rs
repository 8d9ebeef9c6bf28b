//! Resonant low-cut / high-cut filter stage.
//!
//! The chain uses two of these: a high-pass at the input (low cut,
//! 20-200 Hz) and a low-pass near the output (high cut, 5-20 kHz). Both
//! are RBJ biquads with smoothed frequency and Q; at Q = 0.707 the
//! response is Butterworth.

use cinta_core::{Biquad, SmoothedParam, highpass_coefficients, lowpass_coefficients};

/// Which side of the spectrum the filter removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Passes lows, cuts highs (the chain's high-cut position).
    Lowpass,
    /// Passes highs, cuts lows (the chain's low-cut position).
    Highpass,
}

/// Keep the cutoff a little under Nyquist so the RBJ transform stays
/// well conditioned.
const NYQUIST_MARGIN: f32 = 100.0;

const Q_MIN: f32 = 0.1;
const Q_MAX: f32 = 2.0;

/// Second-order resonant filter with per-channel state.
///
/// Frequency and Q targets smooth over 20 ms; coefficients are
/// recomputed once per block from the smoothed values, which is
/// inaudible at this update rate and keeps the per-sample loop down to
/// the biquad difference equation.
pub struct ResonantFilter {
    sample_rate: f32,
    mode: FilterMode,
    frequency: SmoothedParam,
    q: SmoothedParam,
    biquad: Biquad,
    biquad_r: Biquad,
    needs_update: bool,
}

impl ResonantFilter {
    /// Smoothing time for frequency and Q moves.
    pub const SMOOTHING_MS: f32 = 20.0;

    /// Create a filter in the given mode.
    pub fn new(mode: FilterMode, sample_rate: f32, frequency: f32, q: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            mode,
            frequency: SmoothedParam::with_config(frequency, sample_rate, Self::SMOOTHING_MS),
            q: SmoothedParam::with_config(q, sample_rate, Self::SMOOTHING_MS),
            biquad: Biquad::new(),
            biquad_r: Biquad::new(),
            needs_update: true,
        };
        filter.update_coefficients();
        filter
    }

    /// Set the cutoff frequency target in Hz.
    pub fn set_frequency(&mut self, freq: f32) {
        if freq != self.frequency.target() {
            self.frequency.set_target(freq);
            self.needs_update = true;
        }
    }

    /// Set the resonance (Q) target.
    pub fn set_q(&mut self, q: f32) {
        let q = q.clamp(Q_MIN, Q_MAX);
        if q != self.q.target() {
            self.q.set_target(q);
            self.needs_update = true;
        }
    }

    /// Current frequency target in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency.target()
    }

    /// Current Q target.
    pub fn q(&self) -> f32 {
        self.q.target()
    }

    /// Change the sample rate. State should be reset afterwards.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.frequency.set_sample_rate(sample_rate);
        self.q.set_sample_rate(sample_rate);
        self.needs_update = true;
    }

    /// Snap smoothers to their targets and clear filter history.
    pub fn reset(&mut self) {
        self.frequency.snap_to_target();
        self.q.snap_to_target();
        self.biquad.clear();
        self.biquad_r.clear();
        self.update_coefficients();
    }

    /// Filter a block in place. `block` holds one or two channel slices
    /// of equal length.
    pub fn process_block(&mut self, block: &mut [&mut [f32]]) {
        let Some((left, rest)) = block.split_first_mut() else {
            return;
        };
        let frames = left.len();

        self.frequency.advance_block(frames);
        self.q.advance_block(frames);
        if self.needs_update || !self.frequency.is_settled() || !self.q.is_settled() {
            self.update_coefficients();
        }

        for sample in left.iter_mut() {
            *sample = self.biquad.process(*sample);
        }
        if let Some(right) = rest.first_mut() {
            for sample in right.iter_mut() {
                *sample = self.biquad_r.process(*sample);
            }
        }
    }

    fn update_coefficients(&mut self) {
        let max_freq = self.sample_rate / 2.0 - NYQUIST_MARGIN;
        let freq = self.frequency.get().clamp(1.0, max_freq.max(1.0));
        let q = self.q.get().clamp(Q_MIN, Q_MAX);

        let coeffs = match self.mode {
            FilterMode::Lowpass => lowpass_coefficients(freq, q, self.sample_rate),
            FilterMode::Highpass => highpass_coefficients(freq, q, self.sample_rate),
        };
        self.biquad.set_coefficients(coeffs);
        self.biquad_r.set_coefficients(coeffs);
        self.needs_update = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| libm::sinf(core::f32::consts::TAU * freq * i as f32 / sample_rate))
            .collect()
    }

    fn peak(buf: &[f32]) -> f32 {
        buf.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    fn run_mono(filter: &mut ResonantFilter, input: &[f32]) -> Vec<f32> {
        let mut buf = input.to_vec();
        let mut block: [&mut [f32]; 1] = [&mut buf];
        filter.process_block(&mut block);
        buf
    }

    #[test]
    fn highpass_attenuates_low_frequencies() {
        let mut filter = ResonantFilter::new(FilterMode::Highpass, 48000.0, 200.0, 0.707);
        filter.reset();

        let out = run_mono(&mut filter, &sine(30.0, 48000.0, 48000));
        // Skip the transient before measuring.
        assert!(peak(&out[24000..]) < 0.1, "30 Hz should be cut well below 200 Hz corner");
    }

    #[test]
    fn lowpass_passes_low_frequencies() {
        let mut filter = ResonantFilter::new(FilterMode::Lowpass, 48000.0, 5000.0, 0.707);
        filter.reset();

        let out = run_mono(&mut filter, &sine(200.0, 48000.0, 48000));
        let p = peak(&out[24000..]);
        assert!((p - 1.0).abs() < 0.05, "200 Hz should pass a 5 kHz lowpass, peak {p}");
    }

    #[test]
    fn q_clamped_to_range() {
        let mut filter = ResonantFilter::new(FilterMode::Lowpass, 48000.0, 1000.0, 0.707);
        filter.set_q(100.0);
        assert_eq!(filter.q(), 2.0);
        filter.set_q(0.0);
        assert_eq!(filter.q(), 0.1);
    }

    #[test]
    fn stable_at_max_q_with_noise() {
        let mut filter = ResonantFilter::new(FilterMode::Lowpass, 48000.0, 5000.0, 2.0);
        filter.reset();

        // Cheap LCG noise, full scale.
        let mut state = 0x12345678_u32;
        let mut noise: Vec<f32> = (0..48000)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (state >> 8) as f32 / 8388608.0 - 1.0
            })
            .collect();

        let mut block: [&mut [f32]; 1] = [&mut noise];
        filter.process_block(&mut block);
        for &s in noise.iter() {
            assert!(s.is_finite());
            assert!(s.abs() <= 4.0, "resonant peak exceeded bound: {s}");
        }
    }

    #[test]
    fn frequency_change_is_smoothed() {
        let mut filter = ResonantFilter::new(FilterMode::Highpass, 48000.0, 20.0, 0.707);
        filter.reset();
        filter.set_frequency(200.0);

        // After one 64-sample block the smoothed frequency must still be
        // far from the new target.
        let mut silence = vec![0.0_f32; 64];
        let mut block: [&mut [f32]; 1] = [&mut silence];
        filter.process_block(&mut block);
        let f = filter.frequency.get();
        assert!(f > 20.0 && f < 60.0, "smoothing too fast: {f}");
    }
}
