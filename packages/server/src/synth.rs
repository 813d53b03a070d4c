//! The model seam.
//!
//! The voice-cloning model is opaque to this server: it takes cleaned text,
//! the canonical reference WAV and the sampling knobs, and returns float
//! samples with a sample rate. Calls are blocking and are always made from
//! `spawn_blocking`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use refvoice_audio::read_channel0;
use refvoice_domain::{AudioBuffer, SynthesisJob, VoiceError};
use serde::Serialize;

/// Static description of a backend, surfaced by `/health` and `/info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizerInfo {
    pub name: String,
    pub device: String,
    /// Output rate when the backend knows it up front.
    pub sample_rate: Option<u32>,
}

pub trait Synthesizer: Send + Sync {
    fn describe(&self) -> SynthesizerInfo;

    /// Generate speech for `job`. Any failure, including an empty waveform,
    /// is a [`VoiceError::SynthesisFailed`].
    fn synthesize(&self, job: &SynthesisJob) -> Result<AudioBuffer, VoiceError>;
}

/// Runs an external program once per job.
///
/// The job is written to the program's stdin as one JSON object with an
/// extra `output` field. The program must write a WAV file to that path and
/// exit with status 0.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: PathBuf,
    args: Vec<String>,
}

#[derive(Serialize)]
struct CommandPayload<'a> {
    #[serde(flatten)]
    job: &'a SynthesisJob,
    output: &'a Path,
}

/// Bytes of stderr kept in error messages.
const STDERR_TAIL: usize = 2048;

impl CommandSynthesizer {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn failed(&self, what: impl std::fmt::Display) -> VoiceError {
        VoiceError::SynthesisFailed(format!("{}: {what}", self.program.display()))
    }
}

impl Synthesizer for CommandSynthesizer {
    fn describe(&self) -> SynthesizerInfo {
        SynthesizerInfo {
            name: format!("command:{}", self.program.display()),
            device: "external".into(),
            sample_rate: None,
        }
    }

    fn synthesize(&self, job: &SynthesisJob) -> Result<AudioBuffer, VoiceError> {
        let output = tempfile::Builder::new()
            .prefix("refvoice-synth-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| self.failed(format!("failed to create output file: {e}")))?;
        let payload = serde_json::to_vec(&CommandPayload {
            job,
            output: output.path(),
        })
        .map_err(|e| self.failed(format!("failed to encode job: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failed(format!("failed to start: {e}")))?;

        // A program that exits without reading its input breaks the pipe.
        // The child is reaped either way and its own exit status wins.
        let send_error = child
            .stdin
            .take()
            .and_then(|mut stdin| stdin.write_all(&payload).err());

        let result = child
            .wait_with_output()
            .map_err(|e| self.failed(format!("failed to wait: {e}")))?;
        if !result.status.success() {
            if let Some(e) = &send_error {
                tracing::debug!(error = %e, "job not fully sent before the program exited");
            }
            let stderr = String::from_utf8_lossy(&result.stderr);
            let tail_start = stderr.len().saturating_sub(STDERR_TAIL);
            let tail = stderr
                .get(tail_start..)
                .unwrap_or(&stderr)
                .trim();
            return Err(self.failed(format!("exited with {}: {tail}", result.status)));
        }
        if let Some(e) = send_error {
            return Err(self.failed(format!("failed to send job: {e}")));
        }

        let wav = read_channel0(output.path())
            .map_err(|e| self.failed(format!("unusable output: {e}")))?;
        if wav.samples.is_empty() {
            return Err(self.failed("produced no audio"));
        }
        tracing::debug!(
            frames = wav.samples.len(),
            sample_rate = wav.sample_rate,
            "external synthesizer finished"
        );
        Ok(AudioBuffer::new(wav.samples, wav.sample_rate))
    }
}
