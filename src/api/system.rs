//! Liveness and runtime status endpoints.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

/// Reports healthy only once the database answers.
///
/// # Endpoint
/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::DatabaseError(format!("{e:#}")))?;

    Ok(Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.start_time.elapsed().as_secs(),
    }))
}
