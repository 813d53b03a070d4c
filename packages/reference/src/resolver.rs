//! Voice id → admitted, model-ready reference file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use refvoice_audio::{decode, read_channel0, write_float_mono};
use refvoice_domain::{AudioFormat, GateConfig, ReferenceAudioRecord, Result, VoiceError};

use crate::cache::ReferenceCache;

/// Decoded channel 0 of a reference that passed admission.
#[derive(Debug, Clone)]
pub(crate) struct Measured {
    pub format: AudioFormat,
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration: f64,
}

/// Resolves voice identifiers against one references directory.
///
/// Successful resolutions are memoized in the shared [`ReferenceCache`];
/// failures are recomputed on every call so that fixing a file on disk takes
/// effect without a restart.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: Arc<GateConfig>,
    cache: Arc<ReferenceCache>,
}

impl Resolver {
    pub fn new(config: Arc<GateConfig>, cache: Arc<ReferenceCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ReferenceCache> {
        &self.cache
    }

    pub fn references_dir(&self) -> &Path {
        &self.config.references_dir
    }

    /// Return the admitted record for `voice_id`, validating and converting
    /// on first use.
    pub fn resolve(&self, voice_id: &str) -> Result<Arc<ReferenceAudioRecord>> {
        if let Some(hit) = self.cache.get(voice_id) {
            tracing::debug!(voice_id, "reference cache hit");
            return Ok(hit);
        }

        let source = self.discover(voice_id)?;
        let measured = self.validate(&source)?;
        let canonical_path = if measured.format.is_canonical() {
            source.clone()
        } else {
            self.canonicalize(&source, &measured)?
        };

        let record = ReferenceAudioRecord {
            voice_id: voice_id.to_string(),
            source_path: source,
            canonical_path,
            format: measured.format,
            duration_seconds: measured.duration,
            sample_rate: measured.sample_rate,
            channels: measured.channels,
        };
        tracing::info!(
            voice_id,
            path = %record.canonical_path.display(),
            duration = record.duration_seconds,
            converted = record.was_converted(),
            "reference admitted"
        );
        Ok(self.cache.insert(record))
    }

    /// Locate the file for `voice_id`: the name as given, then the same stem
    /// under each configured extension in order.
    fn discover(&self, voice_id: &str) -> Result<PathBuf> {
        if !is_plain_file_name(voice_id) {
            tracing::warn!(voice_id, "voice id is not a plain file name");
            return Err(self.not_found(voice_id));
        }

        let dir = self.references_dir();
        let direct = dir.join(voice_id);
        if direct.is_file() {
            return Ok(direct);
        }

        let stem = Path::new(voice_id)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(voice_id);
        for format in &self.config.supported_formats {
            let candidate = dir.join(format!("{stem}.{}", format.extension()));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        tracing::warn!(voice_id, dir = %dir.display(), "voice file not found");
        Err(self.not_found(voice_id))
    }

    fn not_found(&self, voice_id: &str) -> VoiceError {
        VoiceError::NotFound {
            voice_id: voice_id.to_string(),
            available: self.available_voices(),
        }
    }

    /// Extension gate followed by a full decode and the duration check.
    pub(crate) fn validate(&self, path: &Path) -> Result<Measured> {
        let result = self.measure(path);
        match &result {
            Ok(m) => tracing::info!(
                path = %path.display(),
                format = m.format.extension(),
                duration = m.duration,
                sample_rate = m.sample_rate,
                channels = m.channels,
                "reference validated"
            ),
            Err(e) => tracing::warn!(
                path = %path.display(),
                kind = e.kind(),
                error = %e,
                "reference rejected"
            ),
        }
        result
    }

    fn measure(&self, path: &Path) -> Result<Measured> {
        let Some(format) = self.config.format_of(path) else {
            return Err(VoiceError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                supported: self.config.supported_extensions(),
            });
        };

        let (samples, sample_rate, channels) = match format {
            AudioFormat::Wav => read_channel0(path).map(|w| (w.samples, w.sample_rate, w.channels)),
            _ => decode(path).map(|d| (d.samples, d.sample_rate, d.channels)),
        }
        .map_err(|e| VoiceError::unreadable(path, e))?;

        if samples.is_empty() || sample_rate == 0 {
            return Err(VoiceError::unreadable(path, "audio contains no samples"));
        }

        let duration = samples.len() as f64 / f64::from(sample_rate);
        if duration < self.config.min_duration_secs {
            return Err(VoiceError::TooShort {
                path: path.to_path_buf(),
                duration,
                minimum: self.config.min_duration_secs,
            });
        }

        Ok(Measured {
            format,
            samples,
            sample_rate,
            channels,
            duration,
        })
    }

    /// Write `<stem>.wav` next to `source` unless it already exists.
    ///
    /// The sibling is staged in a temp file in the same directory and linked
    /// into place without replacing anything, so a concurrent conversion of
    /// the same voice leaves exactly one complete file behind.
    fn canonicalize(&self, source: &Path, measured: &Measured) -> Result<PathBuf> {
        let sibling = source.with_extension(AudioFormat::Wav.extension());
        if sibling.is_file() {
            tracing::debug!(path = %sibling.display(), "reusing converted sibling");
            return Ok(sibling);
        }

        let failed = |reason: String| VoiceError::ConversionFailed {
            path: source.to_path_buf(),
            reason,
        };

        let dir = source.parent().unwrap_or_else(|| Path::new("."));
        let staged = tempfile::Builder::new()
            .prefix(".refvoice-")
            .suffix(".wav.part")
            .tempfile_in(dir)
            .map_err(|e| failed(e.to_string()))?;
        write_float_mono(staged.path(), &measured.samples, measured.sample_rate)
            .map_err(|e| failed(e.to_string()))?;

        match staged.persist_noclobber(&sibling) {
            Ok(_) => tracing::info!(
                from = %source.display(),
                to = %sibling.display(),
                "converted reference to wav"
            ),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!(path = %sibling.display(), "sibling written concurrently, reusing");
            }
            Err(e) => return Err(failed(e.error.to_string())),
        }
        Ok(sibling)
    }
}

/// A single path component that cannot escape the references directory.
fn is_plain_file_name(voice_id: &str) -> bool {
    !voice_id.is_empty()
        && voice_id != "."
        && voice_id != ".."
        && !voice_id.contains(['/', '\\', '\0'])
}
