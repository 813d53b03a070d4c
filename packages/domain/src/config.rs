use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_format::AudioFormat;

/// Characters kept by [`TextPolicy::AllowList`] besides ASCII alphanumerics and whitespace.
pub const ALLOWED_PUNCTUATION: &[char] = &['.', ',', '!', '?', '\'', '-', '"', '[', ']', '(', ')'];

// ------------ Text admission ---------------
/// Which characters of the request text reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextPolicy {
    /// ASCII letters, digits, whitespace and [`ALLOWED_PUNCTUATION`].
    /// Keeps paralinguistic tags such as `[laugh]` intact.
    #[default]
    AllowList,
    /// Drop control characters only; any other Unicode passes through.
    StripControl,
}

impl TextPolicy {
    pub fn describe(self) -> &'static str {
        match self {
            Self::AllowList => "ascii letters, digits, whitespace and . , ! ? ' - \" [ ] ( )",
            Self::StripControl => "everything except control characters",
        }
    }
}

// ------------ GateConfig (root) -------------
/// Runtime configuration, resolved once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Directory holding reference voices and their converted siblings.
    pub references_dir: PathBuf,
    /// Admission threshold in seconds.
    pub min_duration_secs: f64,
    /// Finalizer ceiling in dBFS.
    pub target_peak_dbfs: f64,
    /// Accepted formats, in sibling lookup order.
    pub supported_formats: Vec<AudioFormat>,
    /// Cap on cleaned text, in characters.
    pub max_text_chars: usize,
    pub text_policy: TextPolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            references_dir: PathBuf::from("references"),
            min_duration_secs: 5.0,
            target_peak_dbfs: -1.0,
            supported_formats: AudioFormat::DEFAULT_ORDER.to_vec(),
            max_text_chars: 600,
            text_policy: TextPolicy::AllowList,
        }
    }
}

impl GateConfig {
    /// Load a JSON config from disk; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let txt = fs::read_to_string(path)?;
        let cfg: GateConfig = serde_json::from_str(&txt)?;
        Ok(cfg)
    }

    /// Save to disk (pretty‑printed).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Supported format for `path`, if its extension is in the configured set.
    pub fn format_of(&self, path: &Path) -> Option<AudioFormat> {
        AudioFormat::from_path(path).filter(|f| self.supported_formats.contains(f))
    }

    /// Dotted extensions in lookup order, for error payloads.
    pub fn supported_extensions(&self) -> Vec<String> {
        self.supported_formats.iter().map(ToString::to_string).collect()
    }

    /// Ceiling as a linear amplitude.
    pub fn target_peak_linear(&self) -> f64 {
        10f64.powf(self.target_peak_dbfs / 20.0)
    }
}
