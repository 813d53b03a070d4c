//! Admitted reference voices.

use std::path::PathBuf;

use serde::Serialize;

use crate::audio_format::AudioFormat;

/// One reference sample that passed admission.
///
/// Built once by the resolver and never mutated afterwards; shared behind an
/// `Arc` by the cache and every request that uses the voice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceAudioRecord {
    /// Identifier exactly as the caller supplied it.
    pub voice_id: String,
    /// File the record was validated from.
    pub source_path: PathBuf,
    /// WAV file handed to the model.
    pub canonical_path: PathBuf,
    /// Container of `source_path`.
    pub format: AudioFormat,
    /// Duration in seconds, measured at validation time.
    pub duration_seconds: f64,
    /// Sample rate of the decoded source.
    pub sample_rate: u32,
    /// Channel count of the decoded source.
    pub channels: u16,
}

impl ReferenceAudioRecord {
    /// Whether admission had to write a converted sibling.
    pub fn was_converted(&self) -> bool {
        self.source_path != self.canonical_path
    }
}
