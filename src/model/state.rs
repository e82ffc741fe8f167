//! The loaded model shared by all requests.

use crate::config::Config;
use crate::constants::{BYTES_PER_MIB, model_files};
use crate::error::Result;
use crate::inference::{
    Classifier, ComputeDevice, FeatureExtractor, FeatureExtractorConfig, LabelTable,
    OnnxClassifier, TensorNames, cuda_available, select_device,
};
use crate::model::ModelRepo;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Bytes per weight assumed when estimating parameter counts (f32).
const BYTES_PER_PARAMETER: u64 = 4;

/// Classifier, feature extractor, device and label table, immutable after load.
pub struct ModelState {
    model_name: String,
    device: ComputeDevice,
    feature_extractor: FeatureExtractor,
    classifier: Box<dyn Classifier>,
    labels: LabelTable,
    weights_bytes: u64,
}

/// Summary returned by the model-info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Repository id of the model.
    pub model_name: String,
    /// Device the model runs on.
    pub device: ComputeDevice,
    /// Approximate parameter count.
    pub parameters: u64,
    /// Approximate weight size in MiB, two decimals.
    pub size_mb: f64,
    /// Class index to label table.
    pub id2label: LabelTable,
}

impl ModelState {
    /// Assemble a model state from already-built parts.
    pub fn new(
        model_name: impl Into<String>,
        device: ComputeDevice,
        feature_extractor: FeatureExtractor,
        classifier: Box<dyn Classifier>,
        labels: LabelTable,
        weights_bytes: u64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            device,
            feature_extractor,
            classifier,
            labels,
            weights_bytes,
        }
    }

    /// Fetch the model files and build the inference session.
    ///
    /// Blocks on network and disk I/O; call it off the async runtime.
    pub fn load(config: &Config) -> Result<Self> {
        let start = Instant::now();
        let model_config = &config.model;
        info!("Loading model: {}", model_config.id);

        let repo = ModelRepo::from_config(model_config)?;

        let preprocessor_path = repo.resolve(model_files::PREPROCESSOR_CONFIG)?;
        let feature_extractor =
            FeatureExtractor::new(FeatureExtractorConfig::from_file(&preprocessor_path)?)?;

        let labels = LabelTable::from_config_file(&repo.resolve(model_files::MODEL_CONFIG)?)?;

        let weights_path = repo.resolve_any(&model_config.onnx_files)?;
        let weights_bytes = std::fs::metadata(&weights_path)?.len();

        let device = select_device(config.inference.device, cuda_available());
        let classifier = OnnxClassifier::from_file(
            &weights_path,
            device,
            TensorNames {
                input: model_config.input_name.clone(),
                output: model_config.output_name.clone(),
                mask: model_config.mask_name.clone(),
            },
        )?;
        if feature_extractor.config().return_attention_mask
            && !classifier.accepts_attention_mask()
        {
            info!(
                "Graph has no '{}' input, attention mask will not be fed",
                model_config.mask_name
            );
        }

        info!(
            "Model loaded successfully: {} ({} Hz, {} labels) in {:.2}s",
            model_config.id,
            feature_extractor.sampling_rate(),
            labels.len(),
            start.elapsed().as_secs_f64()
        );
        info!("Model labels: {:?}", labels);

        Ok(Self::new(
            model_config.id.clone(),
            device,
            feature_extractor,
            Box::new(classifier),
            labels,
            weights_bytes,
        ))
    }

    /// Repository id of the model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Device the model runs on.
    pub fn device(&self) -> ComputeDevice {
        self.device
    }

    /// The paired feature extractor.
    pub fn feature_extractor(&self) -> &FeatureExtractor {
        &self.feature_extractor
    }

    /// The classifier.
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// The class label table.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Target sample rate for preprocessing.
    pub fn sample_rate(&self) -> u32 {
        self.feature_extractor.sampling_rate()
    }

    /// Parameter count and size estimate plus the label table.
    pub fn info(&self) -> ModelInfo {
        #[allow(clippy::cast_precision_loss)]
        let size_mb = (self.weights_bytes as f64 / BYTES_PER_MIB * 100.0).round() / 100.0;
        ModelInfo {
            model_name: self.model_name.clone(),
            device: self.device,
            parameters: self.weights_bytes / BYTES_PER_PARAMETER,
            size_mb,
            id2label: self.labels.clone(),
        }
    }
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelState")
            .field("model_name", &self.model_name)
            .field("device", &self.device)
            .field("sample_rate", &self.sample_rate())
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}
