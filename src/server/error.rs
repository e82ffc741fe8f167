//! Translation of errors into HTTP responses.

use crate::error::{Error, FailureKind};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Human-readable detail.
    pub detail: String,
}

impl ApiError {
    /// Build an error with an explicit status.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e.kind() {
            FailureKind::ServiceUnavailable => Self::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
            FailureKind::BadInput => {
                warn!("Audio preprocessing failed: {e}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    format!("Audio preprocessing failed: {e}"),
                )
            }
            FailureKind::InferenceFault | FailureKind::StartupFault => {
                error!("Prediction failed: {e}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Prediction failed: {e}"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
