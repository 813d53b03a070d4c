//! HTTP surface.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use refvoice_domain::generation::{
    MIN_P_RANGE, REPETITION_PENALTY_RANGE, TEMPERATURE_RANGE, TOP_K_RANGE, TOP_P_RANGE,
};
use refvoice_domain::{GenerationParams, SynthesisRequest, VoiceError};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::service;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tts", post(tts))
        .route("/tts", post(tts))
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/validate-references", get(validate_references))
        .route("/list-voices", get(list_voices))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn tts(
    State(state): State<AppState>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) =
        payload.map_err(|e| VoiceError::InvalidRequest(e.body_text()))?;
    tracing::info!(voice = %request.voice, "synthesis requested");

    let wav = service::synthesize(&state, request).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CONTENT_DISPOSITION, "attachment; filename=out.wav"),
        ],
        wav,
    )
        .into_response())
}

/// Run a blocking library call off the executor.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| VoiceError::SynthesisFailed(format!("worker task failed: {e}")).into())
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let resolver = state.resolver.clone();
    let voices = blocking(move || resolver.available_voices()).await?;
    let backend = state.synthesizer.as_ref().map(|s| s.describe());

    Ok(Json(json!({
        "status": "healthy",
        "model": backend.as_ref().map(|b| b.name.as_str()),
        "device": backend.as_ref().map(|b| b.device.as_str()),
        "model_loaded": backend.is_some(),
        "references_dir": state.config.references_dir,
        "available_voices": voices.len(),
        "voices": voices,
        "cached_voices": state.cache.len(),
    })))
}

async fn info(State(state): State<AppState>) -> Json<Value> {
    let backend = state.synthesizer.as_ref().map(|s| s.describe());
    let defaults = GenerationParams::default();
    let config = &state.config;

    Json(json!({
        "model": backend.as_ref().map(|b| b.name.as_str()),
        "device": backend.as_ref().map(|b| b.device.as_str()),
        "sample_rate": backend.as_ref().and_then(|b| b.sample_rate),
        "endpoints": {
            "/api/tts": "TTS with voice parameter",
            "/tts": "TTS with full parameter control",
            "/health": "Health check",
            "/info": "Server and model information",
            "/validate-references": "Validate reference audio files",
            "/list-voices": "List available voice samples",
        },
        "parameters": {
            "temperature": range_doc(&TEMPERATURE_RANGE, defaults.temperature),
            "min_p": range_doc(&MIN_P_RANGE, defaults.min_p),
            "top_p": range_doc(&TOP_P_RANGE, defaults.top_p),
            "top_k": { "min": TOP_K_RANGE.start(), "max": TOP_K_RANGE.end(), "default": defaults.top_k },
            "repetition_penalty": range_doc(&REPETITION_PENALTY_RANGE, defaults.repetition_penalty),
            "norm_loudness": { "default": defaults.norm_loudness },
        },
        "reference_requirements": {
            "formats": config.supported_extensions(),
            "minimum_duration": config.min_duration_secs,
            "directory": config.references_dir,
        },
        "output": {
            "format": "wav",
            "encoding": "pcm_s16le",
            "channels": 1,
            "target_peak_dbfs": state.finalizer.target_peak_dbfs(),
        },
        "text": {
            "max_chars": state.cleaner.max_chars(),
            "policy": state.cleaner.policy(),
            "allowed": state.cleaner.policy().describe(),
        },
    }))
}

fn range_doc(range: &std::ops::RangeInclusive<f32>, default: f32) -> Value {
    json!({ "min": range.start(), "max": range.end(), "default": default })
}

async fn validate_references(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let resolver = state.resolver.clone();
    let report = blocking(move || resolver.validate_library()).await?;
    let exists = report.exists;
    let mut body = json!(report);
    if !exists {
        body["error"] = json!("References directory does not exist");
    }
    Ok(Json(body))
}

async fn list_voices(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let resolver = state.resolver.clone();
    let report = blocking(move || resolver.validate_library()).await?;
    let mut body = json!({
        "voices": report.files,
        "count": report.total_files,
        "valid_count": report.valid_files,
        "directory": report.directory,
    });
    if !report.exists {
        body["error"] = json!("References directory does not exist");
    }
    Ok(Json(body))
}
