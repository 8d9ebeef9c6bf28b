//! Tape saturation stage.
//!
//! A normalized tanh waveshaper followed by a drive-dependent one-pole
//! high-frequency rolloff. Harder drive both compresses the waveform
//! and darkens it, the way hotter tape levels do.

use core::f32::consts::PI;
use cinta_core::{SmoothedParam, flush_denormal};
use libm::{expf, tanhf};

/// Drive maps 0..1 onto a waveshaper gain of 1..10.
const DRIVE_GAIN_RANGE: f32 = 9.0;

/// HF rolloff cutoff at zero drive.
const ROLLOFF_MAX_HZ: f32 = 18000.0;
/// HF rolloff cutoff at full drive.
const ROLLOFF_MIN_HZ: f32 = 6000.0;

/// Normalized tanh saturation with per-channel rolloff state.
///
/// The shaper is `y = tanh(x * g) / g` with `g = 1 + 9 * drive`, so the
/// small-signal gain is exactly unity at any drive and only the peaks
/// compress. Drive smooths over 30 ms per sample; the rolloff one-pole
/// coefficient follows the smoothed drive once per block.
pub struct TapeSaturation {
    sample_rate: f32,
    drive: SmoothedParam,
    /// One-pole rolloff state, left and right.
    hf_state: f32,
    hf_state_r: f32,
    hf_coeff: f32,
}

impl TapeSaturation {
    /// Drive smoothing time.
    pub const SMOOTHING_MS: f32 = 30.0;

    /// Create a saturation stage at zero drive.
    pub fn new(sample_rate: f32) -> Self {
        let mut sat = Self {
            sample_rate,
            drive: SmoothedParam::with_config(0.0, sample_rate, Self::SMOOTHING_MS),
            hf_state: 0.0,
            hf_state_r: 0.0,
            hf_coeff: 0.0,
        };
        sat.update_rolloff();
        sat
    }

    /// Set the drive target in 0..1.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive.set_target(drive.clamp(0.0, 1.0));
    }

    /// Current drive target.
    pub fn drive(&self) -> f32 {
        self.drive.target()
    }

    /// Change the sample rate. State should be reset afterwards.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.drive.set_sample_rate(sample_rate);
        self.update_rolloff();
    }

    /// Snap the drive smoother and clear the rolloff state.
    pub fn reset(&mut self) {
        self.drive.snap_to_target();
        self.hf_state = 0.0;
        self.hf_state_r = 0.0;
        self.update_rolloff();
    }

    /// Saturate a block in place.
    pub fn process_block(&mut self, block: &mut [&mut [f32]]) {
        let Some((left, rest)) = block.split_first_mut() else {
            return;
        };
        let mut right = rest.first_mut();
        // Channel slices are expected to match; a short one truncates
        // the block rather than panicking.
        let frames = right
            .as_ref()
            .map_or(left.len(), |r| left.len().min(r.len()));

        // Cutoff tracks the smoothed drive at block rate.
        self.update_rolloff();

        for n in 0..frames {
            let d = self.drive.advance();
            let gain = 1.0 + DRIVE_GAIN_RANGE * d;

            let shaped = shape(left[n], gain);
            self.hf_state = flush_denormal(shaped + self.hf_coeff * (self.hf_state - shaped));
            left[n] = self.hf_state;

            if let Some(r) = right.as_mut() {
                let shaped = shape(r[n], gain);
                self.hf_state_r =
                    flush_denormal(shaped + self.hf_coeff * (self.hf_state_r - shaped));
                r[n] = self.hf_state_r;
            }
        }
    }

    fn update_rolloff(&mut self) {
        let d = self.drive.get().clamp(0.0, 1.0);
        let cutoff = ROLLOFF_MAX_HZ + (ROLLOFF_MIN_HZ - ROLLOFF_MAX_HZ) * d;
        // One-pole lowpass, higher coeff = darker.
        self.hf_coeff = expf(-2.0 * PI * cutoff / self.sample_rate);
    }
}

/// `tanh(x * g) / g`: unity slope at the origin, compression at the peaks.
#[inline]
fn shape(x: f32, gain: f32) -> f32 {
    if gain > 1e-3 {
        flush_denormal(tanhf(x * gain) / gain)
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_mono(sat: &mut TapeSaturation, input: &[f32]) -> Vec<f32> {
        let mut buf = input.to_vec();
        let mut block: [&mut [f32]; 1] = [&mut buf];
        sat.process_block(&mut block);
        buf
    }

    #[test]
    fn small_signals_pass_at_unity() {
        for drive in [0.0, 0.25, 0.5, 1.0] {
            let mut sat = TapeSaturation::new(48000.0);
            sat.set_drive(drive);
            sat.reset();

            let input: Vec<f32> = (0..4800)
                .map(|i| 0.001 * libm::sinf(core::f32::consts::TAU * 440.0 * i as f32 / 48000.0))
                .collect();
            let out = run_mono(&mut sat, &input);

            // Compare peaks past the one-pole transient.
            let in_peak = input[2400..].iter().fold(0.0_f32, |a, s| a.max(s.abs()));
            let out_peak = out[2400..].iter().fold(0.0_f32, |a, s| a.max(s.abs()));
            let ratio = out_peak / in_peak;
            assert!(
                (ratio - 1.0).abs() < 0.01,
                "drive {drive}: small-signal gain {ratio}"
            );
        }
    }

    #[test]
    fn peaks_compress_at_high_drive() {
        let mut sat = TapeSaturation::new(48000.0);
        sat.set_drive(1.0);
        sat.reset();

        let input = vec![0.9_f32; 1000];
        let out = run_mono(&mut sat, &input);
        let settled = out[999];
        // tanh(0.9 * 10) / 10 ≈ 0.1
        assert!(settled < 0.15, "full drive should squash 0.9 to ~0.1, got {settled}");
    }

    #[test]
    fn output_bounded_by_inverse_gain() {
        let mut sat = TapeSaturation::new(48000.0);
        sat.set_drive(0.5);
        sat.reset();

        let out = run_mono(&mut sat, &vec![100.0_f32; 100]);
        for &s in &out {
            assert!(s.is_finite());
            // |tanh| < 1, so |y| < 1/g
            assert!(s.abs() <= 1.0);
        }
    }

    #[test]
    fn higher_drive_darkens_rolloff() {
        let mut cold = TapeSaturation::new(48000.0);
        let mut hot = TapeSaturation::new(48000.0);
        hot.set_drive(1.0);
        cold.reset();
        hot.reset();

        // 12 kHz sits between the two cutoffs.
        let input: Vec<f32> = (0..9600)
            .map(|i| 0.001 * libm::sinf(core::f32::consts::TAU * 12000.0 * i as f32 / 48000.0))
            .collect();
        let out_cold = run_mono(&mut cold, &input);
        let out_hot = run_mono(&mut hot, &input);

        let peak = |b: &[f32]| b.iter().fold(0.0_f32, |a, s| a.max(s.abs()));
        assert!(
            peak(&out_hot[4800..]) < peak(&out_cold[4800..]),
            "full drive should roll off 12 kHz harder"
        );
    }

    #[test]
    fn mismatched_channel_lengths_truncate_instead_of_panicking() {
        let mut sat = TapeSaturation::new(48000.0);
        sat.set_drive(0.8);
        sat.reset();

        let mut left = vec![0.9_f32; 64];
        let mut right = vec![0.9_f32; 32];
        let mut block: [&mut [f32]; 2] = [&mut left, &mut right];
        sat.process_block(&mut block);
        assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
    }

    #[test]
    fn state_flushes_after_silence() {
        let mut sat = TapeSaturation::new(48000.0);
        sat.set_drive(0.5);
        sat.reset();

        run_mono(&mut sat, &vec![1.0_f32; 100]);
        // Long silence lets the one-pole decay to the flush threshold.
        let out = run_mono(&mut sat, &vec![0.0_f32; 200000]);
        assert_eq!(*out.last().unwrap(), 0.0, "tail should flush to exact zero");
    }
}
