//! Audio upload extraction from multipart or raw request bodies.

use crate::audio::AudioClip;
use crate::constants::UPLOAD_FIELD;
use crate::error::Error;
use crate::server::error::ApiError;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use tracing::info;

/// Read the audio clip carried by a request.
///
/// Multipart bodies use the `file` field, or the first field with a
/// non-empty body. Any other body is taken as the raw audio bytes.
pub async fn read_upload<S>(request: Request, state: &S) -> Result<AudioClip, ApiError>
where
    S: Send + Sync,
{
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let clip = if content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    {
        read_multipart(request, state).await?
    } else {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
        AudioClip {
            bytes: bytes.to_vec(),
            file_name: None,
            content_type,
        }
    };

    if clip.bytes.is_empty() {
        return Err(Error::MissingUpload {
            reason: "upload is empty".to_string(),
        }
        .into());
    }

    info!(
        "Received file: {}, {} bytes",
        clip.file_name.as_deref().unwrap_or("<raw body>"),
        clip.bytes.len()
    );
    Ok(clip)
}

async fn read_multipart<S>(request: Request, state: &S) -> Result<AudioClip, ApiError>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

    let mut fallback = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let is_upload_field = field.name() == Some(UPLOAD_FIELD);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        let clip = AudioClip {
            bytes: bytes.to_vec(),
            file_name,
            content_type,
        };
        if is_upload_field {
            return Ok(clip);
        }
        if fallback.is_none() && !clip.bytes.is_empty() {
            fallback = Some(clip);
        }
    }

    fallback.ok_or_else(|| {
        Error::MissingUpload {
            reason: format!("multipart body has no '{UPLOAD_FIELD}' field"),
        }
        .into()
    })
}
