//! Peak limiter and 16-bit encoder for model output.
//!
//! The model hands back float audio that routinely overshoots full scale.
//! [`finalize`] rewrites such a file in place so that its peak sits at or
//! below a dBFS ceiling and the stored samples are 16-bit signed PCM.
//! Gain is only ever reduced, never raised.

use std::path::Path;

use refvoice_domain::{GateConfig, VoiceError};
use serde::Serialize;

use crate::stats::SignalStats;
use crate::wav::{read_channel0, write_pcm16_mono};

pub const STAGE_RAW: &str = "RAW FILE READ";
pub const STAGE_GAIN: &str = "AFTER GAIN STAGING";
pub const STAGE_VERIFY: &str = "AFTER WAV WRITE (VERIFY)";

/// Default ceiling in dBFS.
pub const DEFAULT_TARGET_PEAK_DBFS: f64 = -1.0;

/// What happened to one file. Silent input stops after `raw`.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeReport {
    pub raw: SignalStats,
    pub gain: Option<f64>,
    pub after_gain: Option<SignalStats>,
    pub verified: Option<SignalStats>,
}

impl FinalizeReport {
    /// True when the limiter ran and the file was rewritten.
    pub fn rewritten(&self) -> bool {
        self.verified.is_some()
    }
}

#[inline]
pub fn db_to_linear(dbfs: f64) -> f64 {
    10f64.powf(dbfs / 20.0)
}

/// Gain that brings `peak` down to `target_linear`, capped at unity.
/// `None` for a silent signal.
pub fn limiter_gain(peak: f64, target_linear: f64) -> Option<f64> {
    (peak > 0.0).then(|| (target_linear / peak).min(1.0))
}

/// Multiply in place, then hard-clip to `-1.0‥+1.0`.
pub fn apply_gain(samples: &mut [f32], gain: f64) {
    let g = gain as f32;
    for s in samples.iter_mut() {
        *s = (*s * g).clamp(-1.0, 1.0);
    }
}

/// Limits output files against a fixed ceiling.
#[derive(Debug, Clone, Copy)]
pub struct Finalizer {
    target_peak_dbfs: f64,
}

impl Default for Finalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_PEAK_DBFS)
    }
}

impl Finalizer {
    pub fn new(target_peak_dbfs: f64) -> Self {
        Self { target_peak_dbfs }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.target_peak_dbfs)
    }

    pub fn target_peak_dbfs(&self) -> f64 {
        self.target_peak_dbfs
    }

    pub fn finalize<P: AsRef<Path>>(&self, path: P) -> Result<FinalizeReport, VoiceError> {
        finalize(path, self.target_peak_dbfs)
    }
}

/// Limit and re-encode the WAV at `path` in place.
///
/// Any read or write failure maps to [`VoiceError::FinalizationIo`], as does
/// input carrying NaN or infinite samples.
pub fn finalize<P: AsRef<Path>>(path: P, target_peak_dbfs: f64) -> Result<FinalizeReport, VoiceError> {
    let path = path.as_ref();

    let data = read_channel0(path).map_err(|e| VoiceError::finalization(path, e))?;
    let sample_rate = data.sample_rate;
    let raw = SignalStats::measure(STAGE_RAW, &data.samples, sample_rate, data.source_dtype());
    raw.log();

    if raw.non_finite > 0 {
        return Err(VoiceError::finalization(
            path,
            format!("{} non-finite samples in model output", raw.non_finite),
        ));
    }

    let Some(gain) = limiter_gain(raw.peak, db_to_linear(target_peak_dbfs)) else {
        tracing::info!(path = %path.display(), "silent audio, skipping limiter");
        return Ok(FinalizeReport {
            raw,
            gain: None,
            after_gain: None,
            verified: None,
        });
    };

    let mut samples = data.samples;
    apply_gain(&mut samples, gain);
    let after_gain = SignalStats::measure(STAGE_GAIN, &samples, sample_rate, "float32");
    after_gain.log();
    tracing::debug!(gain, target_peak_dbfs, "limiter gain applied");

    write_pcm16_mono(path, &samples, sample_rate).map_err(|e| VoiceError::finalization(path, e))?;

    let back = read_channel0(path).map_err(|e| VoiceError::finalization(path, e))?;
    let verified = SignalStats::measure(STAGE_VERIFY, &back.samples, back.sample_rate, back.source_dtype());
    verified.log();

    if back.sample_rate != sample_rate || back.samples.len() != samples.len() {
        tracing::warn!(
            path = %path.display(),
            expected_rate = sample_rate,
            actual_rate = back.sample_rate,
            expected_len = samples.len(),
            actual_len = back.samples.len(),
            "read-back mismatch after finalization"
        );
    }

    Ok(FinalizeReport {
        raw,
        gain: Some(gain),
        after_gain: Some(after_gain),
        verified: Some(verified),
    })
}
