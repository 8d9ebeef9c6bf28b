//! Parameter identifiers and the lock-free control/audio bridge.
//!
//! The control thread (GUI, host, test harness) writes plain parameter
//! values into [`TapeParams`]; the audio thread reads them at the top of
//! each block. Values are stored as `f32` bits in `AtomicU32` slots, so
//! neither side ever locks or allocates. Last write wins.

use core::sync::atomic::{AtomicU32, Ordering};

use cinta_core::{ParamDescriptor, ParamUnit};

/// Every control the chain exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Wow modulation depth, 0..1.
    WowDepth,
    /// Low-cut (high-pass) corner frequency in Hz.
    LowCutFreq,
    /// Low-cut resonance.
    LowCutQ,
    /// High-cut (low-pass) corner frequency in Hz.
    HighCutFreq,
    /// High-cut resonance.
    HighCutQ,
    /// Saturation drive, 0..1.
    Drive,
    /// Spectral tilt, -1 (bright) .. 1 (warm).
    Tone,
    /// Bypass toggle; >= 0.5 means bypassed.
    Bypass,
}

impl ParamId {
    /// Number of parameters.
    pub const COUNT: usize = 8;

    /// All parameters in slot order.
    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::WowDepth,
        ParamId::LowCutFreq,
        ParamId::LowCutQ,
        ParamId::HighCutFreq,
        ParamId::HighCutQ,
        ParamId::Drive,
        ParamId::Tone,
        ParamId::Bypass,
    ];

    /// Range and display metadata for this parameter.
    pub const fn descriptor(self) -> ParamDescriptor {
        match self {
            ParamId::WowDepth => {
                ParamDescriptor::new("Wow Depth", "Wow", ParamUnit::Normalized, 0.0, 1.0, 0.0)
            }
            ParamId::LowCutFreq => {
                ParamDescriptor::new("Low Cut", "LowCut", ParamUnit::Hertz, 20.0, 200.0, 20.0)
            }
            ParamId::LowCutQ => {
                ParamDescriptor::new("Low Cut Q", "LC Q", ParamUnit::None, 0.1, 2.0, 0.707)
            }
            ParamId::HighCutFreq => ParamDescriptor::new(
                "High Cut",
                "HighCut",
                ParamUnit::Hertz,
                5000.0,
                20000.0,
                20000.0,
            ),
            ParamId::HighCutQ => {
                ParamDescriptor::new("High Cut Q", "HC Q", ParamUnit::None, 0.1, 2.0, 0.707)
            }
            ParamId::Drive => {
                ParamDescriptor::new("Drive", "Drive", ParamUnit::Normalized, 0.0, 1.0, 0.0)
            }
            ParamId::Tone => {
                ParamDescriptor::new("Tone", "Tone", ParamUnit::Bipolar, -1.0, 1.0, 0.0)
            }
            ParamId::Bypass => {
                ParamDescriptor::new("Bypass", "Bypass", ParamUnit::Toggle, 0.0, 1.0, 0.0)
            }
        }
    }

    const fn slot(self) -> usize {
        match self {
            ParamId::WowDepth => 0,
            ParamId::LowCutFreq => 1,
            ParamId::LowCutQ => 2,
            ParamId::HighCutFreq => 3,
            ParamId::HighCutQ => 4,
            ParamId::Drive => 5,
            ParamId::Tone => 6,
            ParamId::Bypass => 7,
        }
    }
}

/// Lock-free parameter store shared between threads.
///
/// One `AtomicU32` per parameter, holding the plain value's bit
/// pattern. Writes clamp to the descriptor range first; non-finite
/// values are replaced by the descriptor default before clamping so a
/// NaN from a broken control surface can never reach the DSP.
#[derive(Debug)]
pub struct TapeParams {
    slots: [AtomicU32; ParamId::COUNT],
}

impl TapeParams {
    /// Create a store holding every parameter's default.
    pub fn new() -> Self {
        let slots = ParamId::ALL.map(|id| AtomicU32::new(id.descriptor().default.to_bits()));
        Self { slots }
    }

    /// Store a value, clamped to the parameter's range. Safe to call
    /// from any thread.
    pub fn set(&self, id: ParamId, value: f32) {
        let desc = id.descriptor();
        let value = if value.is_finite() { value } else { desc.default };
        self.slots[id.slot()].store(desc.clamp(value).to_bits(), Ordering::Release);
    }

    /// Read a parameter's current plain value.
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.slots[id.slot()].load(Ordering::Acquire))
    }

    /// Current bypass state.
    pub fn bypassed(&self) -> bool {
        self.get(ParamId::Bypass) >= 0.5
    }

    /// Restore every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.set(id, id.descriptor().default);
        }
    }
}

impl Default for TapeParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let params = TapeParams::new();
        for id in ParamId::ALL {
            assert_eq!(params.get(id), id.descriptor().default, "{id:?}");
        }
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let params = TapeParams::new();

        params.set(ParamId::Drive, 3.0);
        assert_eq!(params.get(ParamId::Drive), 1.0);

        params.set(ParamId::LowCutFreq, 5.0);
        assert_eq!(params.get(ParamId::LowCutFreq), 20.0);

        params.set(ParamId::Tone, -8.0);
        assert_eq!(params.get(ParamId::Tone), -1.0);
    }

    #[test]
    fn non_finite_values_fall_back_to_default() {
        let params = TapeParams::new();
        params.set(ParamId::HighCutFreq, 12000.0);
        params.set(ParamId::HighCutFreq, f32::NAN);
        assert_eq!(params.get(ParamId::HighCutFreq), 20000.0);
    }

    #[test]
    fn bypass_threshold() {
        let params = TapeParams::new();
        assert!(!params.bypassed());
        params.set(ParamId::Bypass, 1.0);
        assert!(params.bypassed());
        params.set(ParamId::Bypass, 0.4);
        assert!(!params.bypassed());
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let params = Arc::new(TapeParams::new());
        let writer = Arc::clone(&params);
        let handle = std::thread::spawn(move || {
            writer.set(ParamId::WowDepth, 0.75);
        });
        handle.join().unwrap();
        assert_eq!(params.get(ParamId::WowDepth), 0.75);
    }
}
