//! # Refvoice Server
//!
//! HTTP front end for zero-shot voice cloning. Requests name a reference
//! voice and carry text plus sampling knobs; the server admits the reference,
//! hands the job to a [`Synthesizer`](synth::Synthesizer) and returns the
//! peak-limited result as 16-bit PCM WAV.

pub mod cli;
pub mod error;
pub mod routes;
pub mod service;
pub mod setup;
pub mod state;
pub mod synth;
pub mod text;

pub use cli::Args;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
pub use synth::{CommandSynthesizer, Synthesizer, SynthesizerInfo};
pub use text::TextCleaner;
