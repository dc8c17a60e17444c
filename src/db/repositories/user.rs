use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, OnConflict},
};

use crate::db::WriteOutcome;
use crate::entities::{prelude::*, users};
use crate::models::Role;

/// Stored account record. The hash is an opaque PHC string, never plaintext.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

impl TryFrom<users::Model> for Account {
    type Error = anyhow::Error;

    fn try_from(model: users::Model) -> Result<Self> {
        let role = model
            .role
            .parse()
            .with_context(|| format!("Account {} has an invalid role", model.id))?;

        Ok(Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            role,
            created_at: model.created_at,
        })
    }
}

/// Selects the account a password update applies to.
#[derive(Debug, Clone, Copy)]
pub enum AccountKey<'a> {
    Id(i32),
    Username(&'a str),
}

/// Outcome of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOutcome {
    pub id: i32,
    pub created: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        user.map(Account::try_from).transpose()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Account>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        user.map(Account::try_from).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        let rows = Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        rows.into_iter().map(Account::try_from).collect()
    }

    pub async fn count_with_role(&self, role: Role) -> Result<u64> {
        Users::find()
            .filter(users::Column::Role.eq(role.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to count users by role")
    }

    /// Inserts the account unless the username is already taken. Never
    /// touches an existing row.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<CreateOutcome> {
        if password_hash.is_empty() {
            anyhow::bail!("Refusing to store an empty password hash");
        }

        let active = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = Users::insert(active)
            .on_conflict(
                OnConflict::column(users::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert user")?;

        let account = self
            .find_by_username(username)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User {username} missing after insert"))?;

        Ok(CreateOutcome {
            id: account.id,
            created: inserted > 0,
        })
    }

    pub async fn update_password(
        &self,
        key: AccountKey<'_>,
        new_hash: &str,
    ) -> Result<WriteOutcome> {
        if new_hash.is_empty() {
            anyhow::bail!("Refusing to store an empty password hash");
        }

        let update = Users::update_many().col_expr(
            users::Column::PasswordHash,
            Expr::value(new_hash.to_string()),
        );

        let update = match key {
            AccountKey::Id(id) => update.filter(users::Column::Id.eq(id)),
            AccountKey::Username(name) => update.filter(users::Column::Username.eq(name)),
        };

        let result = update
            .exec(&self.conn)
            .await
            .context("Failed to update password")?;

        Ok(WriteOutcome::from_rows_affected(result.rows_affected))
    }
}
