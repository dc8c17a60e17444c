//! Domain service for editable page content.
//!
//! Each section is a named JSON document. Writes replace the whole document;
//! reads deserialize and fail loudly on a corrupt row.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content section '{0}' not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Content section '{section}' holds an unreadable document: {reason}")]
    Corrupt { section: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ContentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Acknowledgement of an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredSection {
    pub section: String,
    pub id: i32,
}

#[async_trait::async_trait]
pub trait ContentService: Send + Sync {
    /// Returns every section keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Corrupt`] if any stored document fails to deserialize.
    async fn get_all(&self) -> Result<BTreeMap<String, Value>, ContentError>;

    async fn get_section(&self, section: &str) -> Result<Value, ContentError>;

    /// Replaces the document stored under `section`, creating it if absent.
    async fn upsert(&self, section: &str, document: &Value) -> Result<StoredSection, ContentError>;
}
