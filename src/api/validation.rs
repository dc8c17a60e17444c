use super::ApiError;
use crate::constants::limits::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

/// Values below 1 fall back to the defaults; `limit` is capped.
#[must_use]
pub fn normalize_page(page: Option<i64>, limit: Option<i64>) -> (u64, u64) {
    let page = page
        .and_then(|p| u64::try_from(p).ok())
        .filter(|p| *p >= 1)
        .unwrap_or(DEFAULT_PAGE);

    let limit = limit
        .and_then(|l| u64::try_from(l).ok())
        .filter(|l| *l >= 1)
        .map_or(DEFAULT_PAGE_LIMIT, |l| l.min(MAX_PAGE_LIMIT));

    (page, limit)
}

pub fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}
