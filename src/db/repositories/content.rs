use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

use crate::entities::{content, prelude::*};

/// Raw stored section; `data` is the serialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    pub id: i32,
    pub section: String,
    pub data: String,
    pub updated_at: String,
}

impl From<content::Model> for ContentSection {
    fn from(model: content::Model) -> Self {
        Self {
            id: model.id,
            section: model.section,
            data: model.data,
            updated_at: model.updated_at,
        }
    }
}

pub struct ContentRepository {
    conn: DatabaseConnection,
}

impl ContentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<ContentSection>> {
        let rows = Content::find()
            .order_by_asc(content::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list content sections")?;

        Ok(rows.into_iter().map(ContentSection::from).collect())
    }

    pub async fn get(&self, section: &str) -> Result<Option<ContentSection>> {
        let row = Content::find()
            .filter(content::Column::Section.eq(section))
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query content section {section}"))?;

        Ok(row.map(ContentSection::from))
    }

    /// Insert-or-replace keyed on the section name, as one statement. The
    /// stored document is replaced wholesale; the row id is kept.
    pub async fn upsert(&self, section: &str, data: &str) -> Result<ContentSection> {
        let active = content::ActiveModel {
            section: Set(section.to_string()),
            data: Set(data.to_string()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        Content::insert(active)
            .on_conflict(
                OnConflict::column(content::Column::Section)
                    .update_columns([content::Column::Data, content::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to upsert content section {section}"))?;

        self.get(section)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Content section {section} missing after upsert"))
    }

    /// Inserts the section only when no row with that name exists.
    /// Returns whether a row was written.
    pub async fn insert_if_absent(&self, section: &str, data: &str) -> Result<bool> {
        let active = content::ActiveModel {
            section: Set(section.to_string()),
            data: Set(data.to_string()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = Content::insert(active)
            .on_conflict(
                OnConflict::column(content::Column::Section)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to seed content section {section}"))?;

        Ok(inserted > 0)
    }
}
