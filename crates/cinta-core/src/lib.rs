//! Cinta Core - DSP primitives for the tape character engine
//!
//! Foundational building blocks for real-time audio processing with zero
//! allocation in the audio path.
//!
//! # Contents
//!
//! - [`SmoothedParam`] - Exponential (one-pole) parameter smoothing
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients,
//!   including the shelving transforms used by the tone tilt
//! - [`InterpolatedDelay`] - Fractional delay line with linear
//!   interpolation for the wow modulation path
//! - [`Lfo`] - Sine phase-accumulator low-frequency oscillator
//! - [`ParamDescriptor`] - Parameter range metadata and clamping
//! - Math utilities: [`db_to_linear`], [`flush_denormal`], [`sanitize`], ...
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets. Disable the
//! default `std` feature:
//!
//! ```toml
//! [dependencies]
//! cinta-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocation after construction
//! - **No dependency on std**: pure `no_std` with `libm` for math
//! - **Explicit state**: every primitive exposes `clear`/`reset` so the
//!   owning stage controls exactly when history is discarded

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod lfo;
pub mod math;
pub mod param;
pub mod param_info;

pub use biquad::{
    Biquad, Coefficients, high_shelf_coefficients, highpass_coefficients, low_shelf_coefficients,
    lowpass_coefficients,
};
pub use delay::InterpolatedDelay;
pub use lfo::Lfo;
pub use math::{
    db_to_linear, flush_denormal, linear_to_db, ms_to_samples, samples_to_ms, sanitize,
};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamUnit};
