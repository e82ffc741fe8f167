//! Configuration type definitions.

use crate::constants::{
    DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL_ID, DEFAULT_PORT, model_files,
    tensor_names,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Model repository settings.
    pub model: ModelConfig,

    /// Inference settings.
    pub inference: InferenceConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where model files are fetched from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Local directory if `path` is set and exists, else the Hugging Face Hub.
    #[default]
    Auto,
    /// Local directory only.
    Path,
    /// Local Hugging Face cache only, no network.
    Cache,
    /// Hugging Face Hub API, downloading into the cache.
    Api,
}

/// Model repository settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Hugging Face repository id.
    pub id: String,

    /// Optional repository revision (branch, tag or commit).
    pub revision: Option<String>,

    /// Optional local directory holding the model files.
    pub path: Option<PathBuf>,

    /// Repository source.
    pub source: ModelSource,

    /// ONNX weight file candidates, tried in order.
    pub onnx_files: Vec<String>,

    /// Graph input name for the waveform.
    pub input_name: String,

    /// Graph output name for the logits.
    pub output_name: String,

    /// Graph input name for the attention mask, fed only if the graph declares it.
    pub mask_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_MODEL_ID.to_string(),
            revision: None,
            path: None,
            source: ModelSource::Auto,
            onnx_files: model_files::ONNX_CANDIDATES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            input_name: tensor_names::INPUT_VALUES.to_string(),
            output_name: tensor_names::LOGITS.to_string(),
            mask_name: tensor_names::ATTENTION_MASK.to_string(),
        }
    }
}

/// Inference device configuration.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Automatically select (GPU if available, else CPU).
    #[default]
    Auto,
    /// Prefer GPU, warn and fall back to CPU if unavailable.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

/// Inference settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,
}
