//! Sine low-frequency oscillator.
//!
//! The wow engine runs a single, slow (0.5 Hz) sine LFO to sweep its
//! delay-line read position. Phase accumulation keeps the oscillator
//! alias-free and drift-free at sub-audio rates.

use core::f32::consts::PI;
use libm::sinf;

/// Phase-accumulator sine LFO.
///
/// Phase lives in `[0.0, 1.0)` turns and advances by
/// `frequency / sample_rate` per sample.
///
/// # Example
///
/// ```rust
/// use cinta_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0, 0.5);
/// let value = lfo.next(); // in [-1.0, 1.0]
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create an LFO at the given sample rate and frequency.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Rewind the phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Current phase in turns, `[0.0, 1.0)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Produce the next sine value in `[-1.0, 1.0]` and advance the phase.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let output = sinf(self.phase * 2.0 * PI);

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Change the sample rate, preserving the configured frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.phase_inc * self.sample_rate;
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_cycle_per_second_at_1hz() {
        let mut lfo = Lfo::new(44100.0, 1.0);

        for _ in 0..44100 {
            lfo.next();
        }

        let phase_error = lfo.phase.min((lfo.phase - 1.0).abs());
        assert!(phase_error < 0.01);
    }

    #[test]
    fn output_bounded() {
        let mut lfo = Lfo::new(48000.0, 5.0);
        for _ in 0..10000 {
            let v = lfo.next();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn starts_at_zero_crossing() {
        let mut lfo = Lfo::new(48000.0, 0.5);
        let first = lfo.next();
        assert!(first.abs() < 1e-6, "sine should start at 0, got {first}");
    }

    #[test]
    fn sample_rate_change_preserves_frequency() {
        let mut lfo = Lfo::new(44100.0, 0.5);
        lfo.set_sample_rate(96000.0);
        assert!((lfo.frequency() - 0.5).abs() < 1e-4);
    }
}
