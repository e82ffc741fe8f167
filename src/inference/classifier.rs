//! Sequence classifier backed by an ONNX Runtime session.

use crate::constants::tensor_names;
use crate::error::{Error, Result};
use crate::inference::device::{ComputeDevice, configure_session};
use crate::inference::features::FeatureTensor;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Anything that turns features into per-class logits.
pub trait Classifier: Send + Sync {
    /// Run one forward pass and return the logits of the single batch row.
    fn logits(&self, features: &FeatureTensor) -> Result<Vec<f32>>;
}

/// Graph tensor names of an exported classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorNames {
    /// Waveform input name.
    pub input: String,
    /// Logits output name.
    pub output: String,
    /// Attention mask input name.
    pub mask: String,
}

impl Default for TensorNames {
    fn default() -> Self {
        Self {
            input: tensor_names::INPUT_VALUES.to_string(),
            output: tensor_names::LOGITS.to_string(),
            mask: tensor_names::ATTENTION_MASK.to_string(),
        }
    }
}

/// Wav2Vec2 sequence classifier exported to ONNX.
pub struct OnnxClassifier {
    // `Session::run` needs exclusive access
    session: Mutex<Session>,
    names: TensorNames,
    // Set only when the graph declares the mask input
    mask_input: Option<String>,
}

impl OnnxClassifier {
    /// Build an inference session for `model_path` on `device`.
    pub fn from_file(model_path: &Path, device: ComputeDevice, names: TensorNames) -> Result<Self> {
        let builder = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .map_err(|e| Error::ModelLoad {
                reason: e.to_string(),
            })?;
        let builder = configure_session(builder, device)?;

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| Error::ModelLoad {
                reason: format!("{}: {e}", model_path.display()),
            })?;

        info!(
            "Loaded ONNX session from {} on {}",
            model_path.display(),
            device
        );

        let mask_input =
            declared_input(session.inputs.iter().map(|i| i.name.as_str()), &names.mask);
        debug!("Attention mask input: {:?}", mask_input);

        Ok(Self {
            session: Mutex::new(session),
            names,
            mask_input,
        })
    }

    /// Whether the graph takes an attention mask.
    pub fn accepts_attention_mask(&self) -> bool {
        self.mask_input.is_some()
    }
}

impl Classifier for OnnxClassifier {
    fn logits(&self, features: &FeatureTensor) -> Result<Vec<f32>> {
        let shape = features.shape();
        let input = Tensor::from_array((shape, features.input_values.clone())).map_err(|e| {
            Error::Inference {
                reason: format!("failed to build input tensor: {e}"),
            }
        })?;

        let mut session = self.session.lock().map_err(|_| Error::Inference {
            reason: "inference session lock poisoned".to_string(),
        })?;

        let outputs = match (self.mask_input.as_deref(), &features.attention_mask) {
            (Some(mask_name), Some(mask)) => {
                let mask = Tensor::from_array((shape, mask.clone())).map_err(|e| {
                    Error::Inference {
                        reason: format!("failed to build attention mask: {e}"),
                    }
                })?;
                session.run(ort::inputs![
                    self.names.input.as_str() => input,
                    mask_name => mask,
                ])
            }
            _ => session.run(ort::inputs![self.names.input.as_str() => input]),
        }
        .map_err(|e| Error::Inference {
            reason: e.to_string(),
        })?;

        let output = outputs
            .get(self.names.output.as_str())
            .ok_or_else(|| Error::Inference {
                reason: format!("model has no output named '{}'", self.names.output),
            })?;

        let (logits_shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference {
                reason: format!("failed to extract logits: {e}"),
            })?;
        debug!("Logits shape: {:?}", &**logits_shape);

        first_row(logits_shape, data)
    }
}

/// `name` if it is among the graph's declared inputs.
fn declared_input<'a>(inputs: impl IntoIterator<Item = &'a str>, name: &str) -> Option<String> {
    inputs
        .into_iter()
        .any(|input| input == name)
        .then(|| name.to_string())
}

/// The first batch row of a `[batch, classes]` logits tensor.
fn first_row(shape: &[i64], data: &[f32]) -> Result<Vec<f32>> {
    let classes = match shape {
        [_, classes] => usize::try_from(*classes).ok(),
        [classes] => usize::try_from(*classes).ok(),
        _ => None,
    }
    .filter(|&c| c > 0 && c <= data.len())
    .ok_or_else(|| Error::Inference {
        reason: format!("unexpected logits shape {shape:?}"),
    })?;

    Ok(data[..classes].to_vec())
}
