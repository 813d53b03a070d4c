use anyhow::Result;
use hound::SampleFormat;
use refvoice_audio::limiter::{STAGE_GAIN, STAGE_RAW, STAGE_VERIFY};
use refvoice_audio::{Finalizer, finalize, read_channel0, write_float_mono};
use refvoice_domain::VoiceError;
use tempfile::tempdir;

const SR: u32 = 24_000;

/// One second of a 220 Hz tone at `amplitude`.
fn tone(amplitude: f32) -> Vec<f32> {
    (0..SR)
        .map(|i| (i as f32 * 220.0 * std::f32::consts::TAU / SR as f32).sin() * amplitude)
        .collect()
}

#[test]
fn test_hot_output_is_pulled_under_ceiling() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("out.wav");
    let mut samples = tone(0.9);
    samples[100] = 1.8;
    write_float_mono(&path, &samples, SR)?;

    let report = finalize(&path, -1.0)?;

    assert_eq!(report.raw.stage, STAGE_RAW);
    assert!((report.raw.peak - 1.8).abs() < 1e-6);
    assert!(report.raw.clipped >= 1);

    let gain = report.gain.expect("limiter ran");
    assert!((gain - 0.891_250_9 / 1.8).abs() < 1e-6);

    let after = report.after_gain.as_ref().expect("gain stage logged");
    assert_eq!(after.stage, STAGE_GAIN);
    assert!((after.peak - 0.891_250_9).abs() < 1e-5);
    assert_eq!(after.clipped, 0);

    let verified = report.verified.as_ref().expect("read back");
    assert_eq!(verified.stage, STAGE_VERIFY);
    assert_eq!(verified.dtype, "int16");
    assert_eq!(verified.shape, samples.len());
    assert!((verified.peak - 0.891_250_9).abs() < 1e-3);
    assert_eq!(verified.clipped, 0);

    let back = read_channel0(&path)?;
    assert_eq!(back.sample_rate, SR);
    assert_eq!(back.channels, 1);
    assert_eq!(back.bits_per_sample, 16);
    assert_eq!(back.sample_format, SampleFormat::Int);
    Ok(())
}

#[test]
fn test_quiet_output_keeps_its_level() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("quiet.wav");
    write_float_mono(&path, &tone(0.25), SR)?;

    let report = Finalizer::default().finalize(&path)?;

    assert_eq!(report.gain, Some(1.0));
    let verified = report.verified.expect("rewritten");
    assert!((verified.peak - 0.25).abs() < 1e-3);
    assert_eq!(verified.dtype, "int16");
    Ok(())
}

#[test]
fn test_silence_is_left_untouched() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("silent.wav");
    write_float_mono(&path, &vec![0.0; 4_800], SR)?;
    let before = std::fs::read(&path)?;

    let report = finalize(&path, -1.0)?;

    assert!(report.raw.is_silent());
    assert!(report.gain.is_none());
    assert!(!report.rewritten());
    assert_eq!(std::fs::read(&path)?, before);
    Ok(())
}

#[test]
fn test_extreme_overs_never_clip() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("loud.wav");
    write_float_mono(&path, &tone(40.0), SR)?;

    let report = finalize(&path, 0.0)?;

    let verified = report.verified.expect("rewritten");
    assert_eq!(verified.clipped, 0);
    assert!(verified.peak < 1.0);
    Ok(())
}

#[test]
fn test_missing_file_is_finalization_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never-written.wav");
    match finalize(&path, -1.0) {
        Err(VoiceError::FinalizationIo { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected FinalizationIo, got {other:?}"),
    }
}

#[test]
fn test_nan_output_is_rejected_not_passed_through() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("nan.wav");
    write_float_mono(&path, &vec![f32::NAN; 4_800], SR)?;
    let before = std::fs::read(&path)?;

    match finalize(&path, -1.0) {
        Err(VoiceError::FinalizationIo { reason, .. }) => {
            assert!(reason.contains("4800 non-finite"), "{reason}")
        }
        other => panic!("expected FinalizationIo, got {other:?}"),
    }
    assert_eq!(std::fs::read(&path)?, before);

    // One bad sample in otherwise normal audio is enough.
    let mut samples = tone(0.5);
    samples[10] = f32::INFINITY;
    write_float_mono(&path, &samples, SR)?;
    assert!(matches!(
        finalize(&path, -1.0),
        Err(VoiceError::FinalizationIo { .. })
    ));
    Ok(())
}
