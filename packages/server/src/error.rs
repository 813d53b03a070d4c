//! `VoiceError` → HTTP response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use refvoice_domain::VoiceError;
use serde_json::json;

/// Request-boundary wrapper; every handler error ends up here.
#[derive(Debug)]
pub struct ApiError(pub VoiceError);

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        Self(err)
    }
}

pub fn status_for(err: &VoiceError) -> StatusCode {
    match err {
        VoiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        VoiceError::UnsupportedFormat { .. }
        | VoiceError::UnreadableAudio { .. }
        | VoiceError::TooShort { .. } => StatusCode::BAD_REQUEST,
        VoiceError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        VoiceError::ConversionFailed { .. }
        | VoiceError::SynthesisFailed(_)
        | VoiceError::FinalizationIo { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(&err);
        if status.is_server_error() {
            tracing::error!(kind = err.kind(), error = %err, "request failed");
        } else {
            tracing::warn!(kind = err.kind(), error = %err, "request rejected");
        }

        let mut body = json!({
            "detail": err.to_string(),
            "kind": err.kind(),
        });
        match &err {
            VoiceError::NotFound { available, .. } => {
                body["available_voices"] = json!(available);
            }
            VoiceError::TooShort { duration, .. } | VoiceError::UnreadableAudio { duration, .. } => {
                body["duration"] = json!(duration);
            }
            _ => {}
        }
        (status, Json(body)).into_response()
    }
}
