use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, AppState, CreatedResponse, MessageResponse, validation::validate_id};
use crate::db::repositories::submissions::SubmissionKind;
use crate::db::{Contact, JobApplication, TrainingApplication};
use crate::services::{ContactForm, JobForm, SubmissionError, TrainingForm};

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(msg) => ApiError::ValidationError(msg),
            SubmissionError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            SubmissionError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

fn created(message: &str, id: i32) -> Json<CreatedResponse> {
    Json(CreatedResponse {
        message: message.to_string(),
        id,
    })
}

// ============================================================================
// Public intake
// ============================================================================

/// POST /contact
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ContactForm>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state.form_service().submit_contact(form).await?;
    Ok(created("Message sent successfully", id))
}

/// POST /training
pub async fn submit_training(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TrainingForm>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state.form_service().submit_training(form).await?;
    Ok(created("Training application submitted successfully", id))
}

/// POST /jobs
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    Json(form): Json<JobForm>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state.form_service().submit_job(form).await?;
    Ok(created("Job application submitted successfully", id))
}

// ============================================================================
// Admin listing
// ============================================================================

/// GET /cms/contacts
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(state.store().submissions().list_contacts().await?))
}

/// GET /cms/training-applications
pub async fn list_training_applications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrainingApplication>>, ApiError> {
    Ok(Json(
        state
            .store()
            .submissions()
            .list_training_applications()
            .await?,
    ))
}

/// GET /cms/job-applications
pub async fn list_job_applications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JobApplication>>, ApiError> {
    Ok(Json(
        state.store().submissions().list_job_applications().await?,
    ))
}

async fn delete_submission(
    state: &AppState,
    kind: SubmissionKind,
    id: i32,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = validate_id(kind.label(), id)?;
    state.form_service().delete(kind, id).await?;
    Ok(Json(MessageResponse::new(format!("{} deleted", kind.label()))))
}

/// DELETE /cms/contacts/{id}
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_submission(&state, SubmissionKind::Contact, id).await
}

/// DELETE /cms/training-applications/{id}
pub async fn delete_training_application(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_submission(&state, SubmissionKind::Training, id).await
}

/// DELETE /cms/job-applications/{id}
pub async fn delete_job_application(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_submission(&state, SubmissionKind::Job, id).await
}
