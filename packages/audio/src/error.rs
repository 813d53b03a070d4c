//! Error types for the `refvoice_audio` crate.

use std::path::PathBuf;
use thiserror::Error;

/// Low-level audio failure, before it is classified for the caller.
#[derive(Debug, Error)]
pub enum AudioError {
    /// I/O error that occurred while opening or writing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// RIFF/WAVE reader or writer failure.
    #[error("WAV error for {path}: {source}")]
    Wav {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying hound error.
        source: hound::Error,
    },

    /// Container probe or codec failure.
    #[error("decode error for {path}: {source}")]
    Decode {
        /// The file being decoded.
        path: PathBuf,
        /// The underlying symphonia error.
        source: symphonia::core::errors::Error,
    },

    /// The container holds no decodable audio track.
    #[error("no supported audio track in {0}")]
    NoAudioTrack(PathBuf),

    /// Neither the container nor the decoded packets declared a sample rate.
    #[error("unknown sample rate in {0}")]
    UnknownSampleRate(PathBuf),
}

/// A specialized `Result` type for audio operations.
pub type Result<T> = std::result::Result<T, AudioError>;

impl AudioError {
    pub fn wav<P: Into<PathBuf>>(path: P, source: hound::Error) -> Self {
        Self::Wav {
            path: path.into(),
            source,
        }
    }

    pub fn decode<P: Into<PathBuf>>(path: P, source: symphonia::core::errors::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
