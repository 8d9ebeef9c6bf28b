//! Tone tilt stage.
//!
//! One knob tilts the spectrum around the midrange: a low shelf at
//! 250 Hz and a high shelf at 5 kHz carry exactly complementary gains,
//! so turning the control up by `t` adds `t * 6` dB of lows while
//! removing the same amount of highs (and vice versa).

use cinta_core::{Biquad, SmoothedParam, high_shelf_coefficients, low_shelf_coefficients};

/// Low shelf corner.
const LOW_SHELF_HZ: f32 = 250.0;
/// High shelf corner.
const HIGH_SHELF_HZ: f32 = 5000.0;
/// Shelf slope.
const SHELF_Q: f32 = 0.707;
/// Gain swing at full tilt.
const MAX_GAIN_DB: f32 = 6.0;

/// Amounts this close to zero are indistinguishable from flat; the
/// stage skips the shelves entirely. A 0 dB shelf is the identity
/// filter, so the skip only has to keep the two-sample history current
/// (see [`Biquad::prime`]).
const FLAT_EPSILON: f32 = 1e-3;

/// Complementary low/high shelf tilt with per-channel state.
pub struct ToneControl {
    sample_rate: f32,
    /// Tilt amount in -1..1. Positive = warmer, negative = brighter.
    amount: SmoothedParam,
    low: Biquad,
    low_r: Biquad,
    high: Biquad,
    high_r: Biquad,
    needs_update: bool,
}

impl ToneControl {
    /// Tilt smoothing time.
    pub const SMOOTHING_MS: f32 = 20.0;

    /// Create a flat tone stage.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            amount: SmoothedParam::with_config(0.0, sample_rate, Self::SMOOTHING_MS),
            low: Biquad::new(),
            low_r: Biquad::new(),
            high: Biquad::new(),
            high_r: Biquad::new(),
            needs_update: true,
        }
    }

    /// Set the tilt target in -1..1.
    pub fn set_amount(&mut self, amount: f32) {
        let amount = amount.clamp(-1.0, 1.0);
        if amount != self.amount.target() {
            self.amount.set_target(amount);
            self.needs_update = true;
        }
    }

    /// Current tilt target.
    pub fn amount(&self) -> f32 {
        self.amount.target()
    }

    /// Change the sample rate. State should be reset afterwards.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.amount.set_sample_rate(sample_rate);
        self.needs_update = true;
    }

    /// Snap the smoother and clear shelf history.
    pub fn reset(&mut self) {
        self.amount.snap_to_target();
        self.low.clear();
        self.low_r.clear();
        self.high.clear();
        self.high_r.clear();
        self.update_coefficients();
    }

    /// Tilt a block in place.
    pub fn process_block(&mut self, block: &mut [&mut [f32]]) {
        let Some((left, rest)) = block.split_first_mut() else {
            return;
        };
        let frames = left.len();

        let amount = self.amount.advance_block(frames);
        if amount.abs() < FLAT_EPSILON && self.amount.is_settled() {
            // Only the last two samples of a block survive in biquad
            // history, so priming the tail makes the skip exactly
            // equivalent to running 0 dB shelves.
            for &s in &left[frames.saturating_sub(2)..] {
                self.low.prime(s);
                self.high.prime(s);
            }
            if let Some(right) = rest.first_mut() {
                for &s in &right[right.len().saturating_sub(2)..] {
                    self.low_r.prime(s);
                    self.high_r.prime(s);
                }
            }
            return;
        }
        if self.needs_update || !self.amount.is_settled() {
            self.update_coefficients();
        }

        for sample in left.iter_mut() {
            *sample = self.high.process(self.low.process(*sample));
        }
        if let Some(right) = rest.first_mut() {
            for sample in right.iter_mut() {
                *sample = self.high_r.process(self.low_r.process(*sample));
            }
        }
    }

    fn update_coefficients(&mut self) {
        let gain_db = self.amount.get() * MAX_GAIN_DB;

        let low = low_shelf_coefficients(LOW_SHELF_HZ, SHELF_Q, gain_db, self.sample_rate);
        let high = high_shelf_coefficients(HIGH_SHELF_HZ, SHELF_Q, -gain_db, self.sample_rate);
        self.low.set_coefficients(low);
        self.low_r.set_coefficients(low);
        self.high.set_coefficients(high);
        self.high_r.set_coefficients(high);
        self.needs_update = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| 0.25 * libm::sinf(core::f32::consts::TAU * freq * i as f32 / sample_rate))
            .collect()
    }

    fn settled_peak(tone: &mut ToneControl, input: &[f32]) -> f32 {
        let mut buf = input.to_vec();
        let mut block: [&mut [f32]; 1] = [&mut buf];
        tone.process_block(&mut block);
        buf[buf.len() / 2..].iter().fold(0.0_f32, |a, s| a.max(s.abs()))
    }

    #[test]
    fn zero_amount_is_transparent() {
        let mut tone = ToneControl::new(48000.0);
        tone.reset();

        let input = sine(1000.0, 48000.0, 4800);
        let mut buf = input.clone();
        let mut block: [&mut [f32]; 1] = [&mut buf];
        tone.process_block(&mut block);
        assert_eq!(buf, input, "flat tilt must be bit-exact passthrough");
    }

    #[test]
    fn positive_tilt_boosts_lows_cuts_highs() {
        let mut tone = ToneControl::new(48000.0);
        tone.set_amount(1.0);
        tone.reset();
        let low_peak = settled_peak(&mut tone, &sine(50.0, 48000.0, 48000));

        let mut tone = ToneControl::new(48000.0);
        tone.set_amount(1.0);
        tone.reset();
        let high_peak = settled_peak(&mut tone, &sine(15000.0, 48000.0, 48000));

        // ±6 dB at full tilt: 0.25 → ~0.5 low, ~0.125 high.
        assert!((low_peak - 0.5).abs() < 0.05, "low boost off: {low_peak}");
        assert!((high_peak - 0.125).abs() < 0.02, "high cut off: {high_peak}");
    }

    #[test]
    fn tilt_gains_are_complementary() {
        // Boost and cut mirror each other: +t at f_low matches -t at f_high.
        for t in [0.25, 0.5, 1.0] {
            let mut warm = ToneControl::new(48000.0);
            warm.set_amount(t);
            warm.reset();
            let warm_low = settled_peak(&mut warm, &sine(50.0, 48000.0, 48000));

            let mut bright = ToneControl::new(48000.0);
            bright.set_amount(-t);
            bright.reset();
            let bright_high = settled_peak(&mut bright, &sine(15000.0, 48000.0, 48000));

            assert!(
                (warm_low - bright_high).abs() < 0.02,
                "tilt {t}: low boost {warm_low} vs high boost {bright_high}"
            );
        }
    }

    #[test]
    fn flat_skip_is_equivalent_to_zero_db_shelves() {
        // A flat stretch goes through the skip path; re-engaging the
        // tilt afterwards must behave exactly as if identity shelves
        // had been running the whole time.
        let sr = 48000.0;
        let signal = sine(1000.0, sr, 1024);

        let mut tone = ToneControl::new(sr);
        tone.reset();
        let mut actual = signal.clone();
        let mut block: [&mut [f32]; 1] = [&mut actual[..512]];
        tone.process_block(&mut block);
        tone.set_amount(1.0);
        for chunk in actual[512..].chunks_mut(64) {
            let mut block: [&mut [f32]; 1] = [chunk];
            tone.process_block(&mut block);
        }

        // Reference: explicit identity shelves over the flat stretch,
        // then the same smoothed coefficient schedule.
        let mut amount = SmoothedParam::with_config(0.0, sr, ToneControl::SMOOTHING_MS);
        let mut low = Biquad::new();
        let mut high = Biquad::new();
        for &s in &signal[..512] {
            high.process(low.process(s));
        }
        amount.set_target(1.0);
        let mut expected = signal[512..].to_vec();
        for chunk in expected.chunks_mut(64) {
            let a = amount.advance_block(chunk.len());
            let gain_db = a * MAX_GAIN_DB;
            low.set_coefficients(low_shelf_coefficients(LOW_SHELF_HZ, SHELF_Q, gain_db, sr));
            high.set_coefficients(high_shelf_coefficients(HIGH_SHELF_HZ, SHELF_Q, -gain_db, sr));
            for s in chunk.iter_mut() {
                *s = high.process(low.process(*s));
            }
        }

        assert_eq!(&actual[512..], &expected[..]);
    }

    #[test]
    fn midrange_mostly_unaffected() {
        let mut tone = ToneControl::new(48000.0);
        tone.set_amount(1.0);
        tone.reset();

        // ~1.1 kHz sits between the shelves; the two opposing shelves
        // nearly cancel there.
        let peak = settled_peak(&mut tone, &sine(1100.0, 48000.0, 48000));
        assert!((peak - 0.25).abs() < 0.05, "midrange shifted too far: {peak}");
    }
}
