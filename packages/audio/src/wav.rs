//! WAV I/O helpers built on `hound`.
//!
//! Readers always return channel 0 only, as `f32` in `-1.0‥+1.0` for integer
//! formats (float files are passed through unscaled, so overs survive).

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{AudioError, Result};

/// Decoded contents of a WAV file, reduced to its first channel.
#[derive(Debug, Clone)]
pub struct WavData {
    /// Channel 0 samples.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count declared by the file.
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
}

impl WavData {
    /// Frame count divided by sample rate.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Sample type name as it would be read back (`int16`, `float32`, ...).
    pub fn source_dtype(&self) -> String {
        match self.sample_format {
            SampleFormat::Float => format!("float{}", self.bits_per_sample),
            SampleFormat::Int => format!("int{}", self.bits_per_sample),
        }
    }
}

/// Read every sample of `path`, keeping channel 0.
///
/// The whole data chunk is decoded so that truncated or corrupt files fail
/// here rather than later inside the model.
pub fn read_channel0<P: AsRef<Path>>(path: P) -> Result<WavData> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path).map_err(|e| AudioError::wav(path, e))?;
    let spec = reader.spec();
    let stride = usize::from(spec.channels.max(1));

    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(stride)
            .collect::<std::result::Result<Vec<_>, _>>(),
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .step_by(stride)
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<Vec<_>, _>>()
        }
    }
    .map_err(|e| AudioError::wav(path, e))?;

    Ok(WavData {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        sample_format: spec.sample_format,
    })
}

/// Write mono 32-bit float WAV, values stored as-is (no clipping).
pub fn write_float_mono<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    write_with(path.as_ref(), spec, samples, |s| s)
}

/// Write mono 16-bit signed PCM WAV. Input is clipped to `-1.0‥+1.0` and
/// scaled by 32767, so the encoded file never reaches full scale.
pub fn write_pcm16_mono<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    write_with(path.as_ref(), spec, samples, f32_to_i16)
}

/// f32 → i16 with clipping; NaN maps to 0.
#[inline]
pub fn f32_to_i16(s: f32) -> i16 {
    (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

fn write_with<S, F>(path: &Path, spec: WavSpec, samples: &[f32], convert: F) -> Result<()>
where
    S: hound::Sample,
    F: Fn(f32) -> S,
{
    let mut writer = WavWriter::create(path, spec).map_err(|e| AudioError::wav(path, e))?;
    for &s in samples {
        writer
            .write_sample(convert(s))
            .map_err(|e| AudioError::wav(path, e))?;
    }
    writer.finalize().map_err(|e| AudioError::wav(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn stereo_int16_keeps_left_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut w = WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            w.write_sample(16384i16).unwrap(); // left: +0.5
            w.write_sample(-32768i16).unwrap(); // right: -1.0
        }
        w.finalize().unwrap();

        let data = read_channel0(&path).unwrap();
        assert_eq!(data.channels, 2);
        assert_eq!(data.samples.len(), 100);
        assert!(data.samples.iter().all(|&s| (s - 0.5).abs() < 1e-6));
        assert_eq!(data.source_dtype(), "int16");
        assert!((data.duration_secs() - 100.0 / 8000.0).abs() < 1e-12);
    }

    #[test]
    fn float_overs_survive_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hot.wav");
        write_float_mono(&path, &[0.0, 1.8, -1.2], 24_000).unwrap();

        let data = read_channel0(&path).unwrap();
        assert_eq!(data.samples, vec![0.0, 1.8, -1.2]);
        assert_eq!(data.source_dtype(), "float32");
    }

    #[test]
    fn pcm16_never_reaches_full_scale() {
        assert_eq!(f32_to_i16(1.5), i16::MAX);
        assert_eq!(f32_to_i16(-1.5), -i16::MAX);
        assert_eq!(f32_to_i16(f32::NAN), 0);

        let dir = tempdir().unwrap();
        let path = dir.path().join("pcm.wav");
        write_pcm16_mono(&path, &[1.0, -1.0, 0.25], 16_000).unwrap();
        let data = read_channel0(&path).unwrap();
        assert!(data.samples.iter().all(|s| s.abs() < 1.0));
        assert_eq!(data.sample_rate, 16_000);
    }

    #[test]
    fn garbage_is_a_wav_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not riff").unwrap();
        assert!(matches!(read_channel0(&path), Err(AudioError::Wav { .. })));
    }
}
