use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::constants::uploads::FIELD_NAME;
use crate::services::{StoredUpload, UploadError, UploadService};

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MissingFile | UploadError::RejectedType | UploadError::TooLarge { .. } => {
                ApiError::ValidationError(err.to_string())
            }
            UploadError::Storage(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Oversized bodies surface here too once the body limit trips.
fn malformed(err: &MultipartError) -> ApiError {
    tracing::warn!(status = %err.status(), "Rejected multipart upload: {}", err.body_text());
    ApiError::validation(format!("Invalid upload: {}", err.body_text()))
}

/// POST /cms/upload
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<StoredUpload>, ApiError> {
    let uploads = state.upload_service();

    while let Some(mut field) = multipart.next_field().await.map_err(|e| malformed(&e))? {
        if field.name() != Some(FIELD_NAME) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);

        UploadService::check_type(&original_name, content_type.as_deref())?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| malformed(&e))? {
            uploads.check_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        let stored = uploads
            .save(&original_name, content_type.as_deref(), &bytes)
            .await?;

        return Ok(Json(stored));
    }

    Err(UploadError::MissingFile.into())
}
