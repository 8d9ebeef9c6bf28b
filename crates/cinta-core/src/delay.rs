//! Fractional delay line for the wow modulation path.
//!
//! A heap-allocated circular buffer with linearly interpolated reads. The
//! wow engine sweeps the read position a few milliseconds around a 5 ms
//! center, so sub-sample read accuracy is what keeps the pitch wobble
//! free of zipper artifacts.
//!
//! The buffer is sized once at prepare time and never reallocates; no
//! allocation happens during audio processing.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Circular delay buffer with linear fractional-read interpolation.
///
/// # Example
///
/// ```rust
/// use cinta_core::InterpolatedDelay;
///
/// // 50 ms capacity at 48 kHz
/// let mut delay = InterpolatedDelay::from_time(48000.0, 0.05);
/// let out = delay.read_write(1.0, 240.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Create a delay line holding `max_delay_samples` samples.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_samples` is 0.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "delay size must be > 0");

        Self {
            buffer: vec![0.0; max_delay_samples],
            write_pos: 0,
        }
    }

    /// Create a delay line from a sample rate and a capacity in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 1)
    }

    /// Read `delay_samples` (possibly fractional) behind the write head.
    ///
    /// The delay is clamped to the buffer capacity; reads between two
    /// stored samples are linearly interpolated.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let delay_clamped = delay_samples.min((len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        // Sample written `delay_int` samples before the most recent one.
        let read_pos = (self.write_pos + len - delay_int - 1) % len;
        let next_pos = (read_pos + len - 1) % len;

        let a = self.buffer[read_pos];
        let b = self.buffer[next_pos];
        a + (b - a) * frac
    }

    /// Store a sample and advance the write head.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read the delayed output, then write the input. The single-call form
    /// used in the per-sample wow loop.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay_samples: f32) -> f32 {
        let output = self.read(delay_samples);
        self.write(sample);
        output
    }

    /// Zero the buffer and rewind the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
