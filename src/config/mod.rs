//! Configuration loading and management.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{load_config_file, load_default_config};
pub use paths::{config_dir, config_file_path};
pub use types::{
    Config, InferenceConfig, InferenceDevice, ModelConfig, ModelSource, ServerConfig,
};
pub use validate::validate_config;
