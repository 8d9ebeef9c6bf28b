//! Exponentially smoothed parameters for zipper-free automation.
//!
//! Every user-facing control in the tape chain (drive, wow depth, filter
//! cutoff, ...) moves through a [`SmoothedParam`] so that target changes
//! arriving from a control thread never produce audible steps.
//!
//! ## Usage
//!
//! ```rust
//! use cinta_core::SmoothedParam;
//!
//! let mut drive = SmoothedParam::with_config(0.0, 48000.0, 30.0);
//! drive.set_target(0.8);
//!
//! // In the audio callback, one call per sample:
//! for _ in 0..512 {
//!     let d = drive.advance();
//!     // shape the sample with d...
//! }
//! ```

use libm::{expf, powf};

/// One-pole exponential parameter smoother.
///
/// The difference equation is `y[n] = y[n-1] + coeff * (target - y[n-1])`,
/// a first-order lowpass on the target signal. The coefficient is derived
/// from a time constant tau (time to cover 63.2% of the remaining
/// distance):
///
/// `coeff = 1 - exp(-1 / (tau * sample_rate))`
///
/// After 5*tau the value is within 0.7% of the target, which is settled
/// for audio purposes. Advancing never overshoots and converges
/// monotonically.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// One-pole coefficient (1 = instant, near 0 = very slow)
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a smoother holding `initial` with smoothing disabled
    /// (changes are instant until configured).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 44100.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a fully configured smoother.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Set the value the smoother converges towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and current simultaneously (no transition).
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update the sample rate and rederive the coefficient. The smoothing
    /// time constant is preserved, so ramps take the same wall-clock time
    /// at any rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set the smoothing time constant in milliseconds. Zero disables
    /// smoothing.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the new smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Advance `samples` steps in one call and return the new value.
    ///
    /// Closed form of iterating [`advance`](Self::advance):
    /// `y += (target - y) * (1 - (1 - coeff)^samples)`. Block-granular
    /// consumers (filter coefficients recomputed once per block) use this
    /// so they converge at the same rate as per-sample smoothing.
    #[inline]
    pub fn advance_block(&mut self, samples: usize) -> f32 {
        let remain = powf(1.0 - self.coeff, samples as f32);
        self.current = self.target + (self.current - self.target) * remain;
        self.current
    }

    /// Current smoothed value, without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Current target.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the value is within 1e-6 of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jump to the target immediately.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples_per_tau = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples_per_tau);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
