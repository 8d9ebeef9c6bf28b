//! Second-order IIR (biquad) filter.
//!
//! The tape chain uses biquads for the resonant low-cut/high-cut filters
//! and for the shelving tilt EQ. Coefficient functions follow the RBJ
//! Audio EQ Cookbook.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

use crate::math::flush_denormal;

/// Coefficient tuple `(b0, b1, b2, a0, a1, a2)` as produced by the RBJ
/// functions below.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// Direct Form I biquad.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// State (the two-sample x/y histories) persists across blocks; callers
/// reset it explicitly via [`clear`](Self::clear) on re-prepare.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Identity filter: `y[n] = x[n]`.
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Install new coefficients, normalizing by `a0`.
    ///
    /// If any resulting coefficient is non-finite (degenerate frequency or
    /// Q input) the identity set is installed instead, so a bad update can
    /// never poison the filter state.
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        let a0_inv = 1.0 / a0;
        let b0 = b0 * a0_inv;
        let b1 = b1 * a0_inv;
        let b2 = b2 * a0_inv;
        let a1 = a1 * a0_inv;
        let a2 = a2 * a0_inv;

        let all_finite = b0.is_finite()
            && b1.is_finite()
            && b2.is_finite()
            && a1.is_finite()
            && a2.is_finite();
        if all_finite {
            self.b0 = b0;
            self.b1 = b1;
            self.b2 = b2;
            self.a1 = a1;
            self.a2 = a2;
        } else {
            self.b0 = 1.0;
            self.b1 = 0.0;
            self.b2 = 0.0;
            self.a1 = 0.0;
            self.a2 = 0.0;
        }
    }

    /// Process one sample.
    ///
    /// The feedback path is denormal-flushed, so on silence the state
    /// decays to exact zero instead of parking in the subnormal range.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = flush_denormal(
            self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
                - self.a1 * self.y1
                - self.a2 * self.y2,
        );

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Record `input` in the history as if it had just passed through
    /// the identity filter.
    ///
    /// Lets a caller skip an identity-configured biquad while keeping
    /// its two-sample history current, so later coefficient changes see
    /// the same state an actually-processing identity filter would hold.
    #[inline]
    pub fn prime(&mut self, input: f32) {
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = input;
    }

    /// Zero the delay-line state without touching the coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// RBJ low-pass coefficients.
///
/// `q` = 0.707 gives a Butterworth (maximally flat) response.
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b1 = 1.0 - cos_omega;
    let b0 = b1 / 2.0;
    (b0, b1, b0, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
}

/// RBJ high-pass coefficients.
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    (
        b0,
        -(1.0 + cos_omega),
        b0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// RBJ low-shelf coefficients.
///
/// Boosts or cuts everything below `frequency` by `gain_db`, flat above.
/// At 0 dB this is exactly the identity filter.
pub fn low_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);
    let beta = 2.0 * sqrtf(a) * alpha;

    let b0 = a * ((a + 1.0) - (a - 1.0) * cos_omega + beta);
    let b1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) - (a - 1.0) * cos_omega - beta);
    let a0 = (a + 1.0) + (a - 1.0) * cos_omega + beta;
    let a1 = -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) + (a - 1.0) * cos_omega - beta;

    (b0, b1, b2, a0, a1, a2)
}

/// RBJ high-shelf coefficients.
///
/// Boosts or cuts everything above `frequency` by `gain_db`, flat below.
pub fn high_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);
    let beta = 2.0 * sqrtf(a) * alpha;

    let b0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + beta);
    let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - beta);
    let a0 = (a + 1.0) - (a - 1.0) * cos_omega + beta;
    let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) - (a - 1.0) * cos_omega - beta;

    (b0, b1, b2, a0, a1, a2)
}
