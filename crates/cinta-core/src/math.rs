//! DSP math helpers.
//!
//! Allocation-free, `no_std` utility functions shared by the tape chain:
//! level conversion, time conversion, denormal flushing, and non-finite
//! sample sanitation.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// 0 dB → 1.0, -6 dB → ~0.5, +6 dB → ~2.0.
///
/// ```rust
/// use cinta_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels. The input is floored at 1e-10 so
/// silence maps to a large negative number instead of -inf.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert milliseconds to (fractional) samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Convert samples to milliseconds.
#[inline]
pub fn samples_to_ms(samples: f32, sample_rate: f32) -> f32 {
    samples * 1000.0 / sample_rate
}

/// Flush near-subnormal floats to zero.
///
/// Subnormals stall the FPU on most architectures. Recursive stages
/// (biquad feedback, the saturation rolloff one-pole, the wow delay
/// line) can decay indefinitely toward zero after the input goes
/// silent, so their state is flushed below an amplitude of 1e-15 —
/// far under hearing, well above the IEEE 754 subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Replace a non-finite sample with silence.
///
/// NaN or infinity must never leave the chain (or circulate through the
/// delay line); anything non-finite becomes 0.0.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn sanitize(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}
