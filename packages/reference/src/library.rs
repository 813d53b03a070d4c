//! Whole-directory view of the reference library.

use std::fs;
use std::path::PathBuf;

use refvoice_domain::AudioFormat;
use serde::Serialize;

use crate::resolver::Resolver;

/// Admission outcome for one file in the references directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryEntry {
    pub filename: String,
    pub valid: bool,
    /// Measured seconds; `0.0` when the file could not be decoded.
    pub duration: f64,
    pub format: AudioFormat,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryReport {
    pub directory: PathBuf,
    /// False when the references directory is missing.
    pub exists: bool,
    pub total_files: usize,
    pub valid_files: usize,
    pub minimum_duration: f64,
    pub supported_formats: Vec<String>,
    /// Sorted by file name.
    pub files: Vec<LibraryEntry>,
}

impl Resolver {
    /// File names in the references directory with a supported extension, sorted.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub fn available_voices(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.references_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let path = entry.path();
                path.is_file() && self.config().format_of(&path).is_some()
            })
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    /// Run the extension and duration checks on every listed file.
    ///
    /// Nothing is converted and nothing enters the cache.
    pub fn validate_library(&self) -> LibraryReport {
        let dir = self.references_dir();
        let files: Vec<LibraryEntry> = self
            .available_voices()
            .into_iter()
            .filter_map(|filename| {
                let path = dir.join(&filename);
                let format = self.config().format_of(&path)?;
                let entry = match self.validate(&path) {
                    Ok(measured) => LibraryEntry {
                        filename,
                        valid: true,
                        duration: measured.duration,
                        format,
                        error: None,
                    },
                    Err(e) => LibraryEntry {
                        filename,
                        valid: false,
                        duration: e.duration().unwrap_or(0.0),
                        format,
                        error: Some(e.to_string()),
                    },
                };
                Some(entry)
            })
            .collect();

        let valid_files = files.iter().filter(|f| f.valid).count();
        tracing::info!(
            dir = %dir.display(),
            total = files.len(),
            valid = valid_files,
            "reference library scanned"
        );

        LibraryReport {
            directory: dir.to_path_buf(),
            exists: dir.is_dir(),
            total_files: files.len(),
            valid_files,
            minimum_duration: self.config().min_duration_secs,
            supported_formats: self.config().supported_extensions(),
            files,
        }
    }
}
