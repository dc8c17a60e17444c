//! `SeaORM` implementation of the `ContentService` trait.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::db::{ContentSection, Store};
use crate::services::content_service::{ContentError, ContentService, StoredSection};

pub struct SeaOrmContentService {
    store: Store,
}

impl SeaOrmContentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Any non-empty name is a valid section key.
pub fn validate_section_name(section: &str) -> Result<&str, ContentError> {
    if section.is_empty() {
        return Err(ContentError::Validation(
            "Section name cannot be empty".to_string(),
        ));
    }

    Ok(section)
}

fn decode(row: &ContentSection) -> Result<Value, ContentError> {
    serde_json::from_str(&row.data).map_err(|e| {
        error!(section = %row.section, "Stored content document is corrupt: {e}");
        ContentError::Corrupt {
            section: row.section.clone(),
            reason: e.to_string(),
        }
    })
}

#[async_trait]
impl ContentService for SeaOrmContentService {
    async fn get_all(&self) -> Result<BTreeMap<String, Value>, ContentError> {
        let rows = self.store.content().list().await?;

        rows.iter()
            .map(|row| Ok((row.section.clone(), decode(row)?)))
            .collect()
    }

    async fn get_section(&self, section: &str) -> Result<Value, ContentError> {
        validate_section_name(section)?;

        let row = self
            .store
            .content()
            .get(section)
            .await?
            .ok_or_else(|| ContentError::NotFound(section.to_string()))?;

        decode(&row)
    }

    async fn upsert(&self, section: &str, document: &Value) -> Result<StoredSection, ContentError> {
        validate_section_name(section)?;

        let data = serde_json::to_string(document)
            .map_err(|e| ContentError::Validation(format!("Unserializable document: {e}")))?;

        let stored = self.store.content().upsert(section, &data).await?;
        info!(section, id = stored.id, "Content section updated");

        Ok(StoredSection {
            section: stored.section,
            id: stored.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_name_only_rejects_empty() {
        assert!(validate_section_name("").is_err());
        assert_eq!(validate_section_name("hero.en").unwrap(), "hero.en");
        assert_eq!(validate_section_name("关于").unwrap(), "关于");
        assert!(validate_section_name(&"x".repeat(200)).is_ok());
    }
}
