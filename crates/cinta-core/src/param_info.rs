//! Parameter range metadata.
//!
//! Each control of the tape chain carries a [`ParamDescriptor`] holding
//! its display name, unit, and plain-value range. The descriptor is the
//! single source of truth for range clamping: any value arriving from a
//! control surface is silently pulled into `[min, max]` before it
//! reaches the DSP.

/// Unit type used when formatting a parameter value for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz, for the filter cutoff parameters.
    Hertz,
    /// Dimensionless 0..1 amounts (drive, wow depth).
    Normalized,
    /// Signed bipolar amount (tone tilt).
    Bipolar,
    /// On/off toggle values.
    Toggle,
    /// Bare number (Q factors).
    None,
}

/// Immutable metadata for one parameter.
///
/// # Example
///
/// ```rust
/// use cinta_core::{ParamDescriptor, ParamUnit};
///
/// let freq = ParamDescriptor::new("Low Cut", "LowCut", ParamUnit::Hertz, 20.0, 200.0, 20.0);
/// assert_eq!(freq.clamp(500.0), 200.0);
/// assert_eq!(freq.clamp(-3.0), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g. "High Cut Frequency").
    pub name: &'static str,
    /// Short name for small displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit used for value formatting.
    pub unit: ParamUnit,
    /// Minimum allowed plain value.
    pub min: f32,
    /// Maximum allowed plain value.
    pub max: f32,
    /// Value on construction and reset.
    pub default: f32,
}

impl ParamDescriptor {
    /// Construct a descriptor.
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
        }
    }

    /// Pull `value` into the descriptor's range. Out-of-range values are
    /// clamped, never rejected.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}
