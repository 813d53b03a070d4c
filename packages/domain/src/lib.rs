//! # Refvoice Domain
//!
//! Shared domain objects for the refvoice workspace: the reference record
//! produced by admission, the generation knobs and their ranges, the raw
//! model output buffer, runtime configuration and the error taxonomy.
//!
//! Keeping these here lets the resolver, the finalizer and the server depend
//! on one vocabulary without depending on each other.

pub mod audio_buffer;
pub mod audio_format;
pub mod config;
pub mod generation;
pub mod reference;
pub mod voice_error;

pub use audio_buffer::AudioBuffer;
pub use audio_format::AudioFormat;
pub use config::{ALLOWED_PUNCTUATION, GateConfig, TextPolicy};
pub use generation::{GenerationParams, SynthesisJob, SynthesisRequest};
pub use reference::ReferenceAudioRecord;
pub use voice_error::{Result, VoiceError};

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        AudioBuffer, AudioFormat, GateConfig, GenerationParams, ReferenceAudioRecord,
        SynthesisJob, SynthesisRequest, TextPolicy, VoiceError,
    };
}
