//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::constants::bootstrap::ADMIN_USERNAME;
use crate::db::repositories::user::AccountKey;
use crate::db::{Store, WriteOutcome};
use crate::models::Role;
use crate::services::auth_service::{
    AccountSummary, AuthError, AuthService, LoginResult, ResetOutcome,
};
use crate::services::password::PasswordHasher;
use crate::services::token::{Claims, Subject, TokenService};

pub struct SeaOrmAuthService {
    store: Store,
    hasher: PasswordHasher,
    tokens: TokenService,
    min_password_length: usize,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(
        store: Store,
        hasher: PasswordHasher,
        tokens: TokenService,
        min_password_length: usize,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            min_password_length,
        }
    }

    fn validate_new_password(&self, new_password: &str) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::Validation("New password is required".to_string()));
        }

        if new_password.chars().count() < self.min_password_length {
            return Err(AuthError::Validation(format!(
                "New password must be at least {} characters",
                self.min_password_length
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let Some(account) = self.store.users().find_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &account.password_hash).await? {
            warn!(username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&Subject {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
        })?;

        info!(user_id = account.id, "User logged in");

        Ok(LoginResult {
            token,
            user: AccountSummary {
                id: account.id,
                username: account.username,
                role: account.role,
            },
        })
    }

    fn authenticate(&self, token: Option<&str>) -> Result<Claims, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    async fn change_password(
        &self,
        account_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(AuthError::Validation(
                "Current password and new password are required".to_string(),
            ));
        }
        self.validate_new_password(new_password)?;

        // Check-then-update is not transactional; a concurrent delete surfaces
        // as NotFound from the update below.
        let account = self
            .store
            .users()
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !self
            .hasher
            .verify(current_password, &account.password_hash)
            .await?
        {
            return Err(AuthError::IncorrectPassword);
        }

        let new_hash = self.hasher.hash(new_password).await?;

        match self
            .store
            .users()
            .update_password(AccountKey::Id(account_id), &new_hash)
            .await?
        {
            WriteOutcome::Updated => {
                info!(user_id = account_id, "Password changed");
                Ok(())
            }
            WriteOutcome::NotFound => Err(AuthError::AccountNotFound),
        }
    }

    async fn reset_admin_password(&self, new_password: &str) -> Result<(), AuthError> {
        self.validate_new_password(new_password)?;

        let new_hash = self.hasher.hash(new_password).await?;

        match self
            .store
            .users()
            .update_password(AccountKey::Username(ADMIN_USERNAME), &new_hash)
            .await?
        {
            WriteOutcome::Updated => {
                info!("Admin password reset");
                Ok(())
            }
            WriteOutcome::NotFound => Err(AuthError::AccountNotFound),
        }
    }

    async fn reset_or_create_admin(&self, new_password: &str) -> Result<ResetOutcome, AuthError> {
        match self.reset_admin_password(new_password).await {
            Ok(()) => Ok(ResetOutcome::Updated),
            Err(AuthError::AccountNotFound) => {
                let hash = self.hasher.hash(new_password).await?;
                let outcome = self
                    .store
                    .users()
                    .create(ADMIN_USERNAME, &hash, Role::Admin)
                    .await?;

                if outcome.created {
                    info!(user_id = outcome.id, "Admin account created");
                    Ok(ResetOutcome::Created)
                } else {
                    // Created concurrently between the update and the insert
                    self.reset_admin_password(new_password).await?;
                    Ok(ResetOutcome::Updated)
                }
            }
            Err(e) => Err(e),
        }
    }
}
