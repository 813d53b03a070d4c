//! Process-level setup for the server binary.

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose `info` events are shown unless `RUST_LOG` says otherwise.
const DEFAULT_DIRECTIVES: [&str; 4] = [
    "refvoice_server=info",
    "refvoice_reference=info",
    "refvoice_audio=info",
    "tower_http=warn",
];

/// Install the global subscriber. `RUST_LOG`, when set, replaces the defaults.
pub fn configure_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES.join(",")));

    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

/// Create the references directory if it does not exist yet.
pub fn ensure_references_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create references directory {}", dir.display()))
}
