//! Cinta Engine - analog tape character processing
//!
//! A block-based stereo processor that emulates the sound of analog
//! tape: wow (slow pitch wobble), harmonic saturation, a spectral tilt,
//! and resonant band-limiting filters, in a fixed-order chain built on
//! cinta-core primitives.
//!
//! - [`TapeChain`] - the full chain with its prepare/process lifecycle
//! - [`ResonantFilter`] - low-cut / high-cut resonant biquad stage
//! - [`TapeSaturation`] - normalized tanh shaper with HF rolloff
//! - [`ToneControl`] - complementary low/high shelf tilt
//! - [`WowEngine`] - LFO-modulated fractional delay
//! - [`TapeParams`] / [`ParamId`] - lock-free parameter bridge
//!
//! ## Example
//!
//! ```rust
//! use cinta_engine::{ParamId, TapeChain};
//!
//! let mut chain = TapeChain::new();
//! chain.prepare(48000.0, 512, 2)?;
//! chain.set_parameter(ParamId::Drive, 0.25);
//! chain.set_parameter(ParamId::WowDepth, 0.1);
//!
//! let mut left = vec![0.0_f32; 512];
//! let mut right = vec![0.0_f32; 512];
//! let mut block: [&mut [f32]; 2] = [&mut left, &mut right];
//! chain.process(&mut block);
//! # Ok::<(), cinta_engine::PrepareError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chain;
pub mod error;
pub mod params;
pub mod resonant_filter;
pub mod saturation;
pub mod tone;
pub mod wow;

pub use chain::TapeChain;
pub use error::PrepareError;
pub use params::{ParamId, TapeParams};
pub use resonant_filter::{FilterMode, ResonantFilter};
pub use saturation::TapeSaturation;
pub use tone::ToneControl;
pub use wow::WowEngine;
