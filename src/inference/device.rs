//! Compute device selection.

use crate::config::InferenceDevice;
use crate::error::{Error, Result};
#[cfg(feature = "cuda")]
use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
use ort::session::builder::SessionBuilder;
use serde::Serialize;
use tracing::{info, warn};

/// Device the model runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    /// General-purpose processor.
    Cpu,
    /// NVIDIA accelerator via the CUDA execution provider.
    Cuda,
}

impl ComputeDevice {
    /// Short lowercase name reported by the API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
        }
    }
}

impl std::fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the CUDA execution provider can be used in this process.
pub fn cuda_available() -> bool {
    #[cfg(feature = "cuda")]
    {
        match CUDAExecutionProvider::default().is_available() {
            Ok(available) => available,
            Err(e) => {
                tracing::debug!("CUDA availability check failed: {e}");
                false
            }
        }
    }
    #[cfg(not(feature = "cuda"))]
    {
        false
    }
}

/// Pick the compute device for a device preference.
pub fn select_device(requested: InferenceDevice, cuda_available: bool) -> ComputeDevice {
    match requested {
        InferenceDevice::Cpu => {
            info!("Requested device: CPU");
            ComputeDevice::Cpu
        }
        InferenceDevice::Auto if cuda_available => {
            info!("Auto mode: CUDA available, using GPU");
            ComputeDevice::Cuda
        }
        InferenceDevice::Auto => {
            info!("Auto mode: no GPU provider available, using CPU");
            ComputeDevice::Cpu
        }
        InferenceDevice::Gpu if cuda_available => {
            info!("--gpu: selected CUDA provider");
            ComputeDevice::Cuda
        }
        InferenceDevice::Gpu => {
            warn!("GPU requested but no GPU provider available, using CPU");
            ComputeDevice::Cpu
        }
    }
}

/// Register the execution provider for `device` on a session builder.
pub fn configure_session(builder: SessionBuilder, device: ComputeDevice) -> Result<SessionBuilder> {
    match device {
        ComputeDevice::Cpu => Ok(builder),
        #[cfg(feature = "cuda")]
        ComputeDevice::Cuda => builder
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .map_err(|e| Error::ModelLoad {
                reason: format!("failed to register CUDA provider: {e}"),
            }),
        #[cfg(not(feature = "cuda"))]
        ComputeDevice::Cuda => Err(Error::ModelLoad {
            reason: "built without CUDA support".to_string(),
        }),
    }
}
