use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState, MessageResponse};
use crate::models::Role;
use crate::services::{AuthError, Claims, LoginResult, TokenError};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub new_password: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub user: Claims,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::IncorrectPassword => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Token(TokenError::Missing) => ApiError::Unauthorized(err.to_string()),
            AuthError::Token(TokenError::Invalid(_)) => {
                ApiError::Forbidden("Invalid or expired token".to_string())
            }
            AuthError::Token(TokenError::Signing(msg)) => ApiError::InternalError(msg),
            AuthError::Forbidden => ApiError::Forbidden("Admin privileges required".to_string()),
            AuthError::AccountNotFound => ApiError::NotFound(err.to_string()),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Only `Authorization: Bearer <token>` is accepted.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn attach_claims(mut request: Request, claims: Claims) -> Request {
    tracing::Span::current().record("user_id", claims.id);
    request.extensions_mut().insert(claims);
    request
}

/// Rejects the request unless it carries a valid session token.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = state
        .auth_service()
        .authenticate(bearer_token(request.headers()))?;

    Ok(next.run(attach_claims(request, claims)).await)
}

/// Like [`require_token`], and the token must belong to an admin.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = state
        .auth_service()
        .authorize(bearer_token(request.headers()), Role::Admin)?;

    Ok(next.run(attach_claims(request, claims)).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResult>, ApiError> {
    let result = state
        .auth_service()
        .login(payload.username.trim(), &payload.password)
        .await?;

    Ok(Json(result))
}

/// GET /auth/verify
pub async fn verify(Extension(claims): Extension<Claims>) -> Json<VerifyResponse> {
    Json(VerifyResponse { user: claims })
}

/// POST /auth/change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .auth_service()
        .change_password(claims.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// POST /auth/reset-admin-password
pub async fn reset_admin_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .auth_service()
        .reset_admin_password(&payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Admin password reset successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_token_errors_split_401_and_403() {
        assert!(matches!(
            ApiError::from(AuthError::Token(TokenError::Missing)),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Token(TokenError::Invalid("expired".into()))),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Forbidden),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::AccountNotFound),
            ApiError::NotFound(_)
        ));
    }
}
