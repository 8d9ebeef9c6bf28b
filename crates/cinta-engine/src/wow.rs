//! Wow stage: slow pitch wobble via modulated delay.
//!
//! A 0.5 Hz sine LFO sweeps the read position of a fractional delay
//! line around a 5 ms center. The changing delay Doppler-shifts the
//! signal, producing the slow pitch drift of a worn transport. One LFO
//! drives both channels so the image does not wander.

use cinta_core::{InterpolatedDelay, Lfo, SmoothedParam, ms_to_samples};

/// LFO rate. Fixed; wow this slow reads as transport drift, not vibrato.
const WOW_RATE_HZ: f32 = 0.5;
/// Center delay.
const BASE_DELAY_MS: f32 = 5.0;
/// Peak modulation either side of the center at full depth.
const MOD_RANGE_MS: f32 = 45.0;
/// Delay-line capacity. Covers base + full modulation at any rate since
/// the buffer is sized from the prepared rate.
const MAX_DELAY_MS: f32 = 50.0;

/// LFO-modulated fractional delay with per-channel buffers.
///
/// At depth 0 the stage degenerates to a fixed 5 ms delay rather than a
/// hard bypass, so sweeping the depth control through zero never causes
/// a discontinuity.
pub struct WowEngine {
    sample_rate: f32,
    depth: SmoothedParam,
    lfo: Lfo,
    delay: InterpolatedDelay,
    delay_r: InterpolatedDelay,
}

impl WowEngine {
    /// Depth smoothing time.
    pub const SMOOTHING_MS: f32 = 50.0;

    /// Create a wow stage at zero depth, with buffers sized for
    /// `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            depth: SmoothedParam::with_config(0.0, sample_rate, Self::SMOOTHING_MS),
            lfo: Lfo::new(sample_rate, WOW_RATE_HZ),
            delay: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_MS / 1000.0),
            delay_r: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_MS / 1000.0),
        }
    }

    /// Set the depth target in 0..1.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth.set_target(depth.clamp(0.0, 1.0));
    }

    /// Current depth target.
    pub fn depth(&self) -> f32 {
        self.depth.target()
    }

    /// Resize the delay buffers for a new sample rate and clear state.
    ///
    /// Allocates; must not be called from the audio thread.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.depth.set_sample_rate(sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.delay = InterpolatedDelay::from_time(sample_rate, MAX_DELAY_MS / 1000.0);
        self.delay_r = InterpolatedDelay::from_time(sample_rate, MAX_DELAY_MS / 1000.0);
    }

    /// Snap the depth smoother, rewind the LFO and silence the buffers.
    pub fn reset(&mut self) {
        self.depth.snap_to_target();
        self.lfo.reset();
        self.delay.clear();
        self.delay_r.clear();
    }

    /// Apply wow to a block in place.
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

        let max_delay = (self.delay.capacity() - 1) as f32;

        for n in 0..frames {
            let lfo = self.lfo.next();
            let depth = self.depth.advance();

            let delay_ms = BASE_DELAY_MS + lfo * depth * MOD_RANGE_MS;
            // Never below one sample: the read must stay strictly behind
            // the write head.
            let delay_samples = ms_to_samples(delay_ms, self.sample_rate).clamp(1.0, max_delay);

            left[n] = self.delay.read_write(left[n], delay_samples);
            if let Some(r) = right.as_mut() {
                r[n] = self.delay_r.read_write(r[n], delay_samples);
            }
        }
    }
}
