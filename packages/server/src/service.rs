//! One synthesis request, from knobs to finished WAV bytes.

use std::sync::Arc;

use refvoice_audio::write_float_mono;
use refvoice_domain::{SynthesisJob, SynthesisRequest, VoiceError};
use tempfile::NamedTempFile;

use crate::state::AppState;

/// Validate, resolve the reference, run the model and finalize its output.
///
/// The knob and text checks run on the executor; everything touching audio
/// files or the model runs on the blocking pool. The request's output file is
/// removed when this returns, on success and on every error path.
pub async fn synthesize(state: &AppState, request: SynthesisRequest) -> Result<Vec<u8>, VoiceError> {
    request.params.validate()?;

    let text = state.cleaner.clean(&request.text);
    if text.trim().is_empty() {
        return Err(VoiceError::InvalidRequest(
            "text is empty after cleaning".into(),
        ));
    }
    tracing::debug!(voice = %request.voice, chars = text.chars().count(), "text cleaned");

    let state = state.clone();
    let voice = request.voice;
    let params = request.params;
    tokio::task::spawn_blocking(move || {
        let record = state.resolver.resolve(&voice)?;
        let synthesizer = state
            .synthesizer
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| VoiceError::SynthesisFailed("no synthesis backend configured".into()))?;

        let job = SynthesisJob {
            text,
            reference_audio: record.canonical_path.clone(),
            params,
        };
        tracing::info!(
            voice = %record.voice_id,
            reference = %job.reference_audio.display(),
            temperature = params.temperature,
            top_k = params.top_k,
            "generating"
        );
        let audio = synthesizer.synthesize(&job)?;
        if audio.is_empty() || audio.sample_rate == 0 {
            return Err(VoiceError::SynthesisFailed("model returned no audio".into()));
        }
        tracing::info!(
            frames = audio.samples.len(),
            sample_rate = audio.sample_rate,
            seconds = audio.duration_secs(),
            "generation finished"
        );

        let output = scratch_file(&state)?;
        write_float_mono(output.path(), &audio.samples, audio.sample_rate)
            .map_err(|e| VoiceError::finalization(output.path(), e))?;
        state.finalizer.finalize(output.path())?;
        std::fs::read(output.path()).map_err(|e| VoiceError::finalization(output.path(), e))
    })
    .await
    .map_err(|e| VoiceError::SynthesisFailed(format!("synthesis worker failed: {e}")))?
}

fn scratch_file(state: &AppState) -> Result<NamedTempFile, VoiceError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("refvoice-out-").suffix(".wav");
    let dir = state
        .scratch_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    builder
        .tempfile_in(&dir)
        .map_err(|e| VoiceError::finalization(dir, e))
}
