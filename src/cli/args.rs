//! CLI argument definitions.

use crate::config::{InferenceDevice, ModelSource};
use clap::Parser;
use std::path::PathBuf;

/// Human-vs-voicemail detection HTTP service.
#[derive(Debug, Parser)]
#[command(name = "amd-service")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: platform config dir).
    #[arg(short, long, env = "AMD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind host.
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Bind port.
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Hugging Face model repository id.
    #[arg(short, long, env = "AMD_MODEL_ID")]
    pub model: Option<String>,

    /// Model repository revision.
    #[arg(long, env = "AMD_MODEL_REVISION")]
    pub revision: Option<String>,

    /// Local directory holding the model files.
    #[arg(long, env = "AMD_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Where to fetch model files from.
    #[arg(long, value_enum, env = "AMD_MODEL_SOURCE")]
    pub model_source: Option<ModelSource>,

    /// Inference device.
    #[arg(short, long, value_enum, env = "AMD_DEVICE")]
    pub device: Option<InferenceDevice>,

    /// Maximum request body size in bytes.
    #[arg(long, env = "AMD_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "amd-service",
            "--port",
            "9000",
            "--device",
            "cpu",
            "--model-source",
            "cache",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.device, Some(InferenceDevice::Cpu));
        assert_eq!(cli.model_source, Some(ModelSource::Cache));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["amd-service", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["amd-service", "--port", "70000"]).is_err());
    }
}
