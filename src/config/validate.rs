//! Configuration validation.

use crate::config::{Config, ModelSource};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server(config)?;
    validate_model(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<()> {
    let server = &config.server;

    if server.host.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if server.port == 0 {
        return Err(Error::ConfigValidation {
            message: "server.port must be between 1 and 65535".to_string(),
        });
    }

    if server.max_upload_bytes == 0 {
        return Err(Error::ConfigValidation {
            message: "server.max_upload_bytes must be at least 1".to_string(),
        });
    }

    Ok(())
}

fn validate_model(config: &Config) -> Result<()> {
    let model = &config.model;

    if model.id.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "model.id must not be empty".to_string(),
        });
    }

    if model.onnx_files.is_empty() {
        return Err(Error::ConfigValidation {
            message: "model.onnx_files must list at least one candidate".to_string(),
        });
    }

    if model.source == ModelSource::Path && model.path.is_none() {
        return Err(Error::ConfigValidation {
            message: "model.source = \"path\" requires model.path".to_string(),
        });
    }

    if model.input_name.is_empty() || model.output_name.is_empty() || model.mask_name.is_empty() {
        return Err(Error::ConfigValidation {
            message: "model tensor names must not be empty".to_string(),
        });
    }

    Ok(())
}
