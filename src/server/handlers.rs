//! HTTP endpoint handlers.

use crate::constants::SERVICE_NAME;
use crate::error::Error;
use crate::inference::ComputeDevice;
use crate::model::ModelInfo;
use crate::pipeline::{PredictionResult, predict_clip};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::server::upload::read_upload;
use axum::Json;
use axum::extract::{Request, State};
use serde::Serialize;
use std::time::Instant;

/// Health endpoint body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves.
    pub status: &'static str,
    /// Whether the model is loaded.
    pub model_loaded: bool,
    /// Device of the loaded model.
    pub device: Option<ComputeDevice>,
    /// Service name.
    pub service: &'static str,
}

/// `POST /predict`: classify one uploaded clip.
pub async fn predict(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<PredictionResult>, ApiError> {
    let started = Instant::now();
    let model = state.require_model()?;
    let clip = read_upload(request, &state).await?;

    let result = tokio::task::spawn_blocking(move || predict_clip(&model, clip, started))
        .await
        .map_err(|e| Error::Inference {
            reason: format!("prediction task failed: {e}"),
        })??;

    Ok(Json(result))
}

/// `POST /predict-stream`: the uploaded chunk is treated as a complete clip.
pub async fn predict_stream(
    state: State<AppState>,
    request: Request,
) -> Result<Json<PredictionResult>, ApiError> {
    predict(state, request).await
}

/// `GET /health`: liveness, independent of model state.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.is_loaded(),
        device: state.model().map(|m| m.device()),
        service: SERVICE_NAME,
    })
}

/// `GET /model-info`: parameter estimate and label table.
pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    let model = state.require_model()?;
    Ok(Json(model.info()))
}
