//! Unified error for reference admission, synthesis and finalization.
use std::path::PathBuf;

use thiserror::Error;

/// Every failure a synthesis request can end in.
///
/// Variants carry enough structure for the transport layer to build a
/// client-facing detail without re-parsing the message.
#[derive(Debug, Clone, Error)]
pub enum VoiceError {
    /// No file exists for the voice under any supported extension.
    #[error("voice file '{voice_id}' not found in references directory")]
    NotFound {
        /// The identifier the caller asked for.
        voice_id: String,
        /// Every voice currently available, sorted by file name.
        available: Vec<String>,
    },
    /// The file extension is outside the supported set.
    #[error("unsupported audio format: .{extension} (supported: {})", .supported.join(", "))]
    UnsupportedFormat {
        /// The rejected file.
        path: PathBuf,
        /// The extension as found on disk.
        extension: String,
        /// Supported extensions, in lookup order.
        supported: Vec<String>,
    },
    /// Extension is supported but the content could not be decoded, or decoded to nothing.
    #[error("could not read audio file {}: {reason}", .path.display())]
    UnreadableAudio {
        /// The file that failed to decode.
        path: PathBuf,
        /// Decoder message.
        reason: String,
        /// Always `0.0`.
        duration: f64,
    },
    /// Decoded fine but shorter than the admission threshold.
    #[error("audio too short: {duration:.1}s, must be at least {minimum:.1} seconds")]
    TooShort {
        /// The file that was measured.
        path: PathBuf,
        /// The measured duration in seconds.
        duration: f64,
        /// The configured minimum in seconds.
        minimum: f64,
    },
    /// Canonicalization failed after validation succeeded.
    #[error("failed to convert {} to WAV: {reason}", .path.display())]
    ConversionFailed {
        /// The source file.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
    /// The model call failed or produced no audio.
    #[error("TTS generation failed: {0}")]
    SynthesisFailed(String),
    /// Read or write failure while peak limiting.
    #[error("finalization I/O failed for {}: {reason}", .path.display())]
    FinalizationIo {
        /// The output file being finalized.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
    /// The request itself is malformed (out-of-range knob, empty text).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl VoiceError {
    /// Stable snake_case name of the variant, used in logs and response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::UnreadableAudio { .. } => "unreadable_audio",
            Self::TooShort { .. } => "too_short",
            Self::ConversionFailed { .. } => "conversion_failed",
            Self::SynthesisFailed(_) => "synthesis_failed",
            Self::FinalizationIo { .. } => "finalization_io_failed",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Measured duration for the validation variants that carry one.
    pub fn duration(&self) -> Option<f64> {
        match self {
            Self::UnreadableAudio { duration, .. } | Self::TooShort { duration, .. } => {
                Some(*duration)
            }
            _ => None,
        }
    }

    /// Shorthand for an unreadable file; duration is pinned to zero.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::UnreadableAudio {
            path: path.into(),
            reason: reason.to_string(),
            duration: 0.0,
        }
    }

    /// Shorthand for a finalization I/O failure.
    pub fn finalization(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FinalizationIo {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, VoiceError>;
