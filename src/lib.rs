//! amd-service - answering machine detection over HTTP.
//!
//! Loads a pretrained Wav2Vec2 sequence classifier exported to ONNX and
//! classifies uploaded audio clips as human or voicemail.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod server;

use clap::Parser;
use cli::Cli;
use config::{Config, load_config_file, load_default_config, validate_config};
use model::ModelState;
use server::AppState;
use tracing::{error, info};

pub use error::{Error, Result};

/// Main entry point for the amd-service binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(start(config))
}

/// Load the model, then serve until shutdown.
///
/// A model load failure aborts startup before the listener is bound.
pub async fn start(config: Config) -> Result<()> {
    let load_config = config.clone();
    let model = tokio::task::spawn_blocking(move || ModelState::load(&load_config))
        .await
        .map_err(|e| Error::ModelLoad {
            reason: format!("model loader task failed: {e}"),
        })?
        .inspect_err(|e| error!("Failed to load model: {e}"))?;

    let app = server::router(AppState::loaded(model), config.server.max_upload_bytes);
    let listener = server::bind(&config.server).await?;
    server::serve(listener, app).await
}

/// Merge file configuration with CLI and environment overrides.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration: {}", path.display());
            load_config_file(path)?
        }
        None => load_default_config()?,
    };

    if let Some(host) = &cli.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(max_upload_bytes) = cli.max_upload_bytes {
        config.server.max_upload_bytes = max_upload_bytes;
    }
    if let Some(model) = &cli.model {
        config.model.id.clone_from(model);
    }
    if let Some(revision) = &cli.revision {
        config.model.revision = Some(revision.clone());
    }
    if let Some(path) = &cli.model_path {
        config.model.path = Some(path.clone());
    }
    if let Some(source) = cli.model_source {
        config.model.source = source;
    }
    if let Some(device) = cli.device {
        config.inference.device = device;
    }

    validate_config(&config)?;
    Ok(config)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default because CUDA fallback is expected in auto mode.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).init();
}
