//! The tape signal chain.
//!
//! Fixed stage order: low cut → saturation → tone → high cut → wow.
//! The low cut strips rumble before it hits the waveshaper, the high
//! cut band-limits the saturated signal, and wow runs last so its
//! pitch modulation is not re-filtered.
//!
//! Lifecycle: [`prepare`](TapeChain::prepare) → any number of
//! [`process`](TapeChain::process) calls → [`release`](TapeChain::release).
//! Sample-rate or channel-count changes require a fresh `prepare`.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;

use cinta_core::sanitize;

use crate::error::PrepareError;
use crate::params::{ParamId, TapeParams};
use crate::resonant_filter::{FilterMode, ResonantFilter};
use crate::saturation::TapeSaturation;
use crate::tone::ToneControl;
use crate::wow::WowEngine;

/// Sample rate used before the first `prepare`.
const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// The complete tape character processor.
///
/// # Example
///
/// ```rust
/// use cinta_engine::{ParamId, TapeChain};
///
/// let mut chain = TapeChain::new();
/// chain.prepare(48000.0, 512, 2).unwrap();
/// chain.set_parameter(ParamId::Drive, 0.4);
///
/// let mut left = vec![0.0_f32; 512];
/// let mut right = vec![0.0_f32; 512];
/// let mut block: [&mut [f32]; 2] = [&mut left, &mut right];
/// chain.process(&mut block);
/// ```
pub struct TapeChain {
    params: Arc<TapeParams>,
    low_cut: ResonantFilter,
    saturation: TapeSaturation,
    tone: ToneControl,
    high_cut: ResonantFilter,
    wow: WowEngine,
    sample_rate: f64,
    max_block_size: usize,
    num_channels: usize,
    prepared: bool,
}

impl TapeChain {
    /// Create an unprepared chain with every parameter at its default.
    pub fn new() -> Self {
        let params = Arc::new(TapeParams::new());
        Self {
            low_cut: ResonantFilter::new(
                FilterMode::Highpass,
                DEFAULT_SAMPLE_RATE,
                ParamId::LowCutFreq.descriptor().default,
                ParamId::LowCutQ.descriptor().default,
            ),
            saturation: TapeSaturation::new(DEFAULT_SAMPLE_RATE),
            tone: ToneControl::new(DEFAULT_SAMPLE_RATE),
            high_cut: ResonantFilter::new(
                FilterMode::Lowpass,
                DEFAULT_SAMPLE_RATE,
                ParamId::HighCutFreq.descriptor().default,
                ParamId::HighCutQ.descriptor().default,
            ),
            wow: WowEngine::new(DEFAULT_SAMPLE_RATE),
            params,
            sample_rate: f64::from(DEFAULT_SAMPLE_RATE),
            max_block_size: 0,
            num_channels: 0,
            prepared: false,
        }
    }

    /// Validate the configuration, size all buffers, and snap every
    /// smoother to its current target.
    ///
    /// Allocates (the wow delay lines); never call from the audio
    /// thread. Safe to call repeatedly.
    pub fn prepare(
        &mut self,
        sample_rate: f64,
        max_block_size: usize,
        num_channels: usize,
    ) -> Result<(), PrepareError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(PrepareError::ZeroBlockSize);
        }
        if num_channels == 0 || num_channels > 2 {
            return Err(PrepareError::UnsupportedChannelCount(num_channels));
        }

        let sr = sample_rate as f32;
        self.low_cut.set_sample_rate(sr);
        self.saturation.set_sample_rate(sr);
        self.tone.set_sample_rate(sr);
        self.high_cut.set_sample_rate(sr);
        self.wow.set_sample_rate(sr);

        self.pull_targets();
        self.low_cut.reset();
        self.saturation.reset();
        self.tone.reset();
        self.high_cut.reset();
        self.wow.reset();

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.num_channels = num_channels;
        self.prepared = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, num_channels, "chain prepared");

        Ok(())
    }

    /// Process a block in place.
    ///
    /// `block` holds one slice per channel, all of equal length up to
    /// the prepared maximum. Never panics, never allocates, never
    /// blocks. Calls before `prepare` (or after `release`) leave the
    /// block untouched. With bypass engaged the chain returns before
    /// advancing any smoother or stage state, so the block passes
    /// through untouched and processing state is frozen, not reset.
    pub fn process(&mut self, block: &mut [&mut [f32]]) {
        if !self.prepared || block.is_empty() || block[0].is_empty() {
            return;
        }
        if self.params.bypassed() {
            return;
        }

        self.pull_targets();

        // Bad input must not poison filter or delay state.
        for channel in block.iter_mut() {
            for sample in channel.iter_mut() {
                *sample = sanitize(*sample);
            }
        }

        self.low_cut.process_block(block);
        self.saturation.process_block(block);
        self.tone.process_block(block);
        self.high_cut.process_block(block);
        self.wow.process_block(block);

        for channel in block.iter_mut() {
            for sample in channel.iter_mut() {
                *sample = sanitize(*sample);
            }
        }
    }

    /// Set a parameter's plain value. Thread-safe; out-of-range values
    /// are clamped silently. Takes effect at the next block boundary.
    pub fn set_parameter(&self, id: ParamId, value: f32) {
        self.params.set(id, value);
    }

    /// Current plain value of a parameter.
    pub fn parameter(&self, id: ParamId) -> f32 {
        self.params.get(id)
    }

    /// Shared handle to the parameter store, for a control thread that
    /// outlives individual calls into the chain.
    pub fn params(&self) -> Arc<TapeParams> {
        Arc::clone(&self.params)
    }

    /// Drop the prepared state and silence all internal buffers.
    /// Idempotent; `prepare` must be called before processing again.
    pub fn release(&mut self) {
        self.low_cut.reset();
        self.saturation.reset();
        self.tone.reset();
        self.high_cut.reset();
        self.wow.reset();
        self.max_block_size = 0;
        self.num_channels = 0;
        self.prepared = false;

        #[cfg(feature = "tracing")]
        tracing::debug!("chain released");
    }

    /// Whether `prepare` has succeeded since construction or the last
    /// `release`.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Sample rate from the last successful `prepare`.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Copy the atomic store's current values into the stage smoothers.
    fn pull_targets(&mut self) {
        self.low_cut.set_frequency(self.params.get(ParamId::LowCutFreq));
        self.low_cut.set_q(self.params.get(ParamId::LowCutQ));
        self.saturation.set_drive(self.params.get(ParamId::Drive));
        self.tone.set_amount(self.params.get(ParamId::Tone));
        self.high_cut.set_frequency(self.params.get(ParamId::HighCutFreq));
        self.high_cut.set_q(self.params.get(ParamId::HighCutQ));
        self.wow.set_depth(self.params.get(ParamId::WowDepth));
    }
}

impl Default for TapeChain {
    fn default() -> Self {
        Self::new()
    }
}
