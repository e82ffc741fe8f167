//! Wav2Vec2-style feature extraction.

use crate::audio::Waveform;
use crate::constants::feature_extractor::{DEFAULT_SAMPLING_RATE, NORMALIZE_EPSILON};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Fields of `preprocessor_config.json` the extractor honours.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureExtractorConfig {
    /// Expected input sample rate.
    pub sampling_rate: u32,
    /// Apply zero-mean unit-variance normalization.
    pub do_normalize: bool,
    /// Also feed an attention mask to the model.
    pub return_attention_mask: bool,
    /// Value used for padding.
    pub padding_value: f32,
    /// Channels per frame; Wav2Vec2 expects 1.
    pub feature_size: usize,
}

impl Default for FeatureExtractorConfig {
    fn default() -> Self {
        Self {
            sampling_rate: DEFAULT_SAMPLING_RATE,
            do_normalize: true,
            return_attention_mask: false,
            padding_value: 0.0,
            feature_size: 1,
        }
    }
}

impl FeatureExtractorConfig {
    /// Read a `preprocessor_config.json` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| Error::ModelMetadata {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Model input derived from a framed waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTensor {
    /// Input values, shape `[1, len]`.
    pub input_values: Vec<f32>,
    /// Attention mask, shape `[1, len]`, when the model takes one.
    pub attention_mask: Option<Vec<i64>>,
}

impl FeatureTensor {
    /// Tensor shape `[batch, samples]`.
    pub fn shape(&self) -> [usize; 2] {
        [1, self.input_values.len()]
    }
}

/// Converts waveforms into classifier input.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureExtractorConfig,
}

impl FeatureExtractor {
    /// Create an extractor from its configuration.
    pub fn new(config: FeatureExtractorConfig) -> Result<Self> {
        if config.feature_size != 1 {
            return Err(Error::FeatureExtraction {
                reason: format!(
                    "unsupported feature_size {}, expected raw mono waveform input",
                    config.feature_size
                ),
            });
        }
        if config.sampling_rate == 0 {
            return Err(Error::FeatureExtraction {
                reason: "sampling_rate must be positive".to_string(),
            });
        }
        Ok(Self { config })
    }

    /// Sample rate the extractor expects.
    pub fn sampling_rate(&self) -> u32 {
        self.config.sampling_rate
    }

    /// Extractor configuration.
    pub fn config(&self) -> &FeatureExtractorConfig {
        &self.config
    }

    /// Build the model input for one waveform.
    ///
    /// A single clip pads to its own length, so no padding is applied here.
    pub fn extract(&self, waveform: &Waveform) -> Result<FeatureTensor> {
        if waveform.sample_rate != self.config.sampling_rate {
            return Err(Error::FeatureExtraction {
                reason: format!(
                    "waveform is {} Hz, extractor expects {} Hz",
                    waveform.sample_rate, self.config.sampling_rate
                ),
            });
        }
        if waveform.samples.is_empty() {
            return Err(Error::FeatureExtraction {
                reason: "waveform is empty".to_string(),
            });
        }

        let input_values = if self.config.do_normalize {
            zero_mean_unit_var(&waveform.samples)
        } else {
            waveform.samples.clone()
        };

        let attention_mask = self
            .config
            .return_attention_mask
            .then(|| vec![1; input_values.len()]);

        Ok(FeatureTensor {
            input_values,
            attention_mask,
        })
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn zero_mean_unit_var(samples: &[f32]) -> Vec<f32> {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let var = samples
        .iter()
        .map(|&s| (f64::from(s) - mean).powi(2))
        .sum::<f64>()
        / n;
    let std = (var + f64::from(NORMALIZE_EPSILON)).sqrt();
    samples
        .iter()
        .map(|&s| ((f64::from(s) - mean) / std) as f32)
        .collect()
}
