//! Feature extraction and classification.

mod classifier;
pub mod device;
mod features;
mod labels;
mod prediction;

pub use classifier::{Classifier, OnnxClassifier, TensorNames};
pub use device::{ComputeDevice, cuda_available, select_device};
pub use features::{FeatureExtractor, FeatureExtractorConfig, FeatureTensor};
pub use labels::LabelTable;
pub use prediction::{ClassPrediction, softmax};
