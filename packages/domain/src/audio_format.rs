//! Reference audio containers accepted at admission.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE, the canonical container handed to the model.
    Wav,
    /// MPEG-1/2 layer III.
    Mp3,
    /// Ogg/Vorbis.
    Ogg,
    /// Free Lossless Audio Codec.
    Flac,
}

impl AudioFormat {
    /// Default lookup order. `Wav` first so a same-stem WAV always wins.
    pub const DEFAULT_ORDER: [AudioFormat; 4] = [Self::Wav, Self::Mp3, Self::Ogg, Self::Flac];

    /// Lower-case extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
        }
    }

    /// Case-insensitive match on a bare extension (`"MP3"`, `"wav"`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::DEFAULT_ORDER
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    /// Format implied by a path's extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether files of this format can be handed to the model as-is.
    pub fn is_canonical(self) -> bool {
        matches!(self, Self::Wav)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        assert_eq!(AudioFormat::from_extension("MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("Flac"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_extension("aiff"), None);
        assert_eq!(
            AudioFormat::from_path(Path::new("refs/alice.WAV")),
            Some(AudioFormat::Wav)
        );
        assert_eq!(AudioFormat::from_path(Path::new("refs/alice")), None);
    }

    #[test]
    fn only_wav_is_canonical() {
        let canonical: Vec<_> = AudioFormat::DEFAULT_ORDER
            .into_iter()
            .filter(|f| f.is_canonical())
            .collect();
        assert_eq!(canonical, vec![AudioFormat::Wav]);
    }
}
