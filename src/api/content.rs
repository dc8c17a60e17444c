use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::{ContentError, StoredSection};

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ContentError::Validation(msg) => ApiError::ValidationError(msg),
            ContentError::Corrupt { .. } => ApiError::InternalError(err.to_string()),
            ContentError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub data: Option<Value>,
}

/// Falsy scalars (`null`, `false`, `0`, `""`) count as missing.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn document_from(payload: UpdateContentRequest) -> Result<Value, ApiError> {
    match payload.data {
        Some(document) if !is_blank(&document) => Ok(document),
        _ => Err(ApiError::validation("Content data is required")),
    }
}

/// GET /cms/content
pub async fn get_all_content(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Value>>, ApiError> {
    let sections = state.content_service().get_all().await?;
    Ok(Json(sections))
}

/// GET /cms/content/{section}
pub async fn get_section(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let document = state.content_service().get_section(&section).await?;
    Ok(Json(document))
}

/// PUT /cms/content/{section}
pub async fn update_section(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
    Json(payload): Json<UpdateContentRequest>,
) -> Result<Json<StoredSection>, ApiError> {
    let document = document_from(payload)?;
    let stored = state.content_service().upsert(&section, &document).await?;
    Ok(Json(stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(data: Option<Value>) -> UpdateContentRequest {
        UpdateContentRequest { data }
    }

    #[test]
    fn test_document_rejects_missing_data() {
        assert!(document_from(request(None)).is_err());
        assert!(document_from(request(Some(Value::Null))).is_err());
        assert!(document_from(request(Some(json!("")))).is_err());
        assert!(document_from(request(Some(json!(false)))).is_err());
        assert!(document_from(request(Some(json!(0)))).is_err());
        assert!(document_from(request(Some(json!(0.0)))).is_err());
    }

    #[test]
    fn test_document_keeps_any_other_value() {
        assert_eq!(document_from(request(Some(json!({})))).unwrap(), json!({}));
        assert_eq!(document_from(request(Some(json!([1, 2])))).unwrap(), json!([1, 2]));
        assert_eq!(document_from(request(Some(json!(true)))).unwrap(), json!(true));
        assert_eq!(document_from(request(Some(json!(7)))).unwrap(), json!(7));
    }

    #[test]
    fn test_corrupt_section_is_a_server_error() {
        let err = ApiError::from(ContentError::Corrupt {
            section: "hero".into(),
            reason: "EOF".into(),
        });
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
