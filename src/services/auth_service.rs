//! Domain service for authentication and account credentials.
//!
//! Handles login, token verification, password changes, and the admin
//! password reset.

use serde::Serialize;
use thiserror::Error;

use crate::models::Role;
use crate::services::token::{Claims, TokenError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Insufficient privileges")]
    Forbidden,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: AccountSummary,
}

/// What an admin password reset did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Updated,
    Created,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and mints a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Validates a presented bearer token.
    fn authenticate(&self, token: Option<&str>) -> Result<Claims, AuthError>;

    /// Like [`AuthService::authenticate`], additionally requiring the given role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] when the token is valid but the role differs.
    fn authorize(&self, token: Option<&str>, role: Role) -> Result<Claims, AuthError> {
        let claims = self.authenticate(token)?;
        if claims.role == role {
            Ok(claims)
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Changes the password of the account a token was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::IncorrectPassword`] if `current_password` does not match,
    /// [`AuthError::AccountNotFound`] if the account no longer exists.
    async fn change_password(
        &self,
        account_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Sets a new password on the bootstrap admin account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccountNotFound`] if there is no admin account.
    async fn reset_admin_password(&self, new_password: &str) -> Result<(), AuthError>;

    /// Sets the admin password, creating the admin account if it is missing.
    async fn reset_or_create_admin(&self, new_password: &str) -> Result<ResetOutcome, AuthError>;
}
