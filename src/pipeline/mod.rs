//! Request processing pipeline.

mod predict;

pub use predict::{PredictionModelInfo, PredictionResult, predict_clip};
