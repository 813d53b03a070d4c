use std::path::PathBuf;
use std::sync::Arc;

use refvoice_audio::Finalizer;
use refvoice_domain::GateConfig;
use refvoice_reference::{ReferenceCache, Resolver};

use crate::synth::Synthesizer;
use crate::text::TextCleaner;

/// Shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub cache: Arc<ReferenceCache>,
    pub resolver: Resolver,
    pub finalizer: Finalizer,
    pub cleaner: TextCleaner,
    /// `None` leaves the listing endpoints up while synthesis fails.
    pub synthesizer: Option<Arc<dyn Synthesizer>>,
    /// Where per-request output files are created; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        config: GateConfig,
        synthesizer: Option<Arc<dyn Synthesizer>>,
    ) -> Result<Self, regex::Error> {
        let config = Arc::new(config);
        let cache = Arc::new(ReferenceCache::new());
        Ok(Self {
            resolver: Resolver::new(Arc::clone(&config), Arc::clone(&cache)),
            finalizer: Finalizer::from_config(&config),
            cleaner: TextCleaner::new(config.text_policy, config.max_text_chars)?,
            config,
            cache,
            synthesizer,
            scratch_dir: None,
        })
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}
