//! Per-stage signal measurements for the output trace.

use serde::Serialize;

/// Level snapshot of a channel-0 signal at one point of finalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalStats {
    pub stage: &'static str,
    pub sample_rate: u32,
    /// Sample type as stored on disk, e.g. `float32`.
    pub dtype: String,
    /// Frame count.
    pub shape: usize,
    /// Max absolute value.
    pub peak: f64,
    pub rms: f64,
    /// Count of samples with `|x| >= 1.0`.
    pub clipped: usize,
    /// NaN and infinite samples. They are left out of `peak` and `rms`.
    pub non_finite: usize,
}

impl SignalStats {
    pub fn measure(stage: &'static str, samples: &[f32], sample_rate: u32, dtype: impl Into<String>) -> Self {
        let mut peak = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut clipped = 0usize;
        let mut non_finite = 0usize;
        for &s in samples {
            if !s.is_finite() {
                non_finite += 1;
                continue;
            }
            let v = f64::from(s);
            let a = v.abs();
            if a > peak {
                peak = a;
            }
            if a >= 1.0 {
                clipped += 1;
            }
            sum_sq += v * v;
        }
        let rms = if samples.is_empty() {
            0.0
        } else {
            (sum_sq / samples.len() as f64).sqrt()
        };

        Self {
            stage,
            sample_rate,
            dtype: dtype.into(),
            shape: samples.len(),
            peak,
            rms,
            clipped,
            non_finite,
        }
    }

    /// A signal whose peak is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.peak == 0.0
    }

    /// Emit one structured trace line.
    pub fn log(&self) {
        tracing::info!(
            stage = self.stage,
            sample_rate = self.sample_rate,
            dtype = %self.dtype,
            shape = self.shape,
            peak = format_args!("{:.6}", self.peak),
            rms = format_args!("{:.6}", self.rms),
            clipped_samples = self.clipped,
            non_finite = self.non_finite,
            "signal stats"
        );
    }
}
