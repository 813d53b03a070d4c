//! Command line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, ensure};
use clap::{Parser, ValueEnum};
use refvoice_domain::{GateConfig, TextPolicy};

use crate::synth::{CommandSynthesizer, Synthesizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextPolicyArg {
    AllowList,
    StripControl,
}

impl From<TextPolicyArg> for TextPolicy {
    fn from(arg: TextPolicyArg) -> Self {
        match arg {
            TextPolicyArg::AllowList => TextPolicy::AllowList,
            TextPolicyArg::StripControl => TextPolicy::StripControl,
        }
    }
}

/// Voice-cloning TTS server with reference admission and output limiting
#[derive(Debug, Clone, Parser)]
#[command(name = "refvoice-server", version, about)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "REFVOICE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "REFVOICE_PORT", default_value_t = 5002)]
    pub port: u16,

    /// JSON config file providing defaults for the options below
    #[arg(long, env = "REFVOICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding reference voices
    #[arg(long, env = "REFVOICE_REFERENCES_DIR")]
    pub references_dir: Option<PathBuf>,

    /// Minimum reference duration in seconds
    #[arg(long, env = "REFVOICE_MIN_DURATION")]
    pub min_duration: Option<f64>,

    /// Output peak ceiling in dBFS
    #[arg(long, env = "REFVOICE_TARGET_PEAK_DBFS", allow_hyphen_values = true)]
    pub target_peak_dbfs: Option<f64>,

    /// Character cap applied to cleaned request text
    #[arg(long, env = "REFVOICE_MAX_TEXT_CHARS")]
    pub max_text_chars: Option<usize>,

    /// Which characters of the request text reach the model
    #[arg(long, env = "REFVOICE_TEXT_POLICY", value_enum)]
    pub text_policy: Option<TextPolicyArg>,

    /// Program that performs synthesis; reads a JSON job on stdin
    #[arg(long, env = "REFVOICE_SYNTH_COMMAND")]
    pub synth_command: Option<PathBuf>,

    /// Extra argument for the synthesis program (repeatable)
    #[arg(
        long = "synth-arg",
        env = "REFVOICE_SYNTH_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub synth_args: Vec<String>,
}

impl Args {
    /// Config file (if any) overlaid with explicit flags, then checked.
    pub fn gate_config(&self) -> anyhow::Result<GateConfig> {
        let mut config = match &self.config {
            Some(path) => GateConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GateConfig::default(),
        };

        if let Some(dir) = &self.references_dir {
            config.references_dir = dir.clone();
        }
        if let Some(secs) = self.min_duration {
            config.min_duration_secs = secs;
        }
        if let Some(dbfs) = self.target_peak_dbfs {
            config.target_peak_dbfs = dbfs;
        }
        if let Some(chars) = self.max_text_chars {
            config.max_text_chars = chars;
        }
        if let Some(policy) = self.text_policy {
            config.text_policy = policy.into();
        }

        validate(&config)?;
        Ok(config)
    }

    pub fn synthesizer(&self) -> Option<Arc<dyn Synthesizer>> {
        self.synth_command.as_ref().map(|program| {
            Arc::new(CommandSynthesizer::new(program.clone(), self.synth_args.clone()))
                as Arc<dyn Synthesizer>
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate(config: &GateConfig) -> anyhow::Result<()> {
    ensure!(
        config.min_duration_secs.is_finite() && config.min_duration_secs > 0.0,
        "min duration must be a positive number of seconds, got {}",
        config.min_duration_secs
    );
    ensure!(
        config.target_peak_dbfs.is_finite() && config.target_peak_dbfs <= 0.0,
        "target peak must be at or below 0 dBFS, got {}",
        config.target_peak_dbfs
    );
    ensure!(config.max_text_chars > 0, "max text chars must be positive");
    ensure!(
        !config.supported_formats.is_empty(),
        "at least one reference format must be supported"
    );
    Ok(())
}
