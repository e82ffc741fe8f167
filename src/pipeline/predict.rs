//! Single clip prediction pipeline.

use crate::audio::{AudioClip, preprocess_audio};
use crate::error::Result;
use crate::inference::{ClassPrediction, ComputeDevice, LabelTable};
use crate::model::ModelState;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Model details attached to each prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionModelInfo {
    /// Repository id of the model.
    pub model_name: String,
    /// Device the model runs on.
    pub device: ComputeDevice,
    /// Duration of the framed waveform fed to the model.
    pub audio_length_seconds: f64,
    /// Class index to label table.
    pub id2label: LabelTable,
}

/// Response body of the predict endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    /// Lower-cased predicted label.
    pub label: String,
    /// Probability of the predicted label.
    pub confidence: f32,
    /// Wall-clock time of the whole predict call.
    pub processing_time_ms: f64,
    /// Model details.
    pub model_info: PredictionModelInfo,
}

/// Preprocess one clip, run the classifier and build the response.
///
/// `started` marks when the request began, so upload time is included.
pub fn predict_clip(
    model: &ModelState,
    clip: AudioClip,
    started: Instant,
) -> Result<PredictionResult> {
    let waveform = preprocess_audio(clip, model.sample_rate())?;

    debug!("Extracting features...");
    let features = model.feature_extractor().extract(&waveform)?;

    let logits = model.classifier().logits(&features)?;
    let prediction = ClassPrediction::from_logits(&logits, model.labels())?;

    let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;

    info!(
        logits = ?logits,
        probabilities = ?prediction.probabilities,
        predicted_class = prediction.index,
        mapped_label = %prediction.label,
        confidence = prediction.confidence,
        time_ms = processing_time_ms,
        "inference details"
    );
    info!(
        "Prediction: {} (confidence: {:.3}, time: {:.1} ms)",
        prediction.label, prediction.confidence, processing_time_ms
    );

    Ok(PredictionResult {
        label: prediction.label,
        confidence: prediction.confidence,
        processing_time_ms,
        model_info: PredictionModelInfo {
            model_name: model.model_name().to_string(),
            device: model.device(),
            audio_length_seconds: waveform.duration_secs(),
            id2label: model.labels().clone(),
        },
    })
}
