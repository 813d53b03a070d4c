//! Generation-control knobs and the synthesis request body.
//!
//! Every knob has a closed range. Values outside it are rejected with
//! [`VoiceError::InvalidRequest`]; nothing is clamped on the caller's behalf.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::voice_error::{Result, VoiceError};

/// Closed range for `temperature`.
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.05..=5.0;
/// Closed range for `min_p`.
pub const MIN_P_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Closed range for `top_p`.
pub const TOP_P_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Closed range for `top_k`.
pub const TOP_K_RANGE: RangeInclusive<u32> = 1..=100;
/// Closed range for `repetition_penalty`.
pub const REPETITION_PENALTY_RANGE: RangeInclusive<f32> = 0.5..=2.0;

/// Sampling parameters forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    pub min_p: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    /// Ask the model to loudness-normalize its own output.
    pub norm_loudness: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 1.7,
            min_p: 0.1,
            top_p: 0.9,
            top_k: 50,
            repetition_penalty: 1.0,
            norm_loudness: true,
        }
    }
}

impl GenerationParams {
    /// Reject the first knob that falls outside its documented range.
    pub fn validate(&self) -> Result<()> {
        check_f32("temperature", self.temperature, &TEMPERATURE_RANGE)?;
        check_f32("min_p", self.min_p, &MIN_P_RANGE)?;
        check_f32("top_p", self.top_p, &TOP_P_RANGE)?;
        if !TOP_K_RANGE.contains(&self.top_k) {
            return Err(VoiceError::InvalidRequest(format!(
                "top_k must be between {} and {}, got {}",
                TOP_K_RANGE.start(),
                TOP_K_RANGE.end(),
                self.top_k
            )));
        }
        check_f32(
            "repetition_penalty",
            self.repetition_penalty,
            &REPETITION_PENALTY_RANGE,
        )
    }
}

fn check_f32(name: &str, value: f32, range: &RangeInclusive<f32>) -> Result<()> {
    // NaN fails `contains`, so non-finite input is rejected here too
    if range.contains(&value) {
        Ok(())
    } else {
        Err(VoiceError::InvalidRequest(format!(
            "{name} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

/// JSON body of `POST /api/tts` and `POST /tts`.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    /// Reference voice identifier, normally a file name in the references directory.
    pub voice: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Everything the model needs for one call.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisJob {
    /// Cleaned text.
    pub text: String,
    /// Canonical WAV of the admitted reference voice.
    pub reference_audio: PathBuf,
    pub params: GenerationParams,
}
