//! Configuration errors.
//!
//! Only the lifecycle boundary returns errors; the audio path never
//! does. Range violations on parameters are clamped, and bad samples
//! are sanitized, so [`PrepareError`] is the single error type.

use thiserror::Error;

/// Rejected `prepare` configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// Sample rate must be finite and positive.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    /// Block size must be nonzero.
    #[error("maximum block size must be nonzero")]
    ZeroBlockSize,

    /// Only mono and stereo are supported.
    #[error("unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannelCount(usize),
}
