use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{normalize_page, require_text, validate_id};
use super::{
    ApiError, AppState, BlogListResponse, BlogPostDto, BlogPostResponse, CreatedResponse,
    MessageResponse, PageQuery, Pagination,
};
use crate::db::{BlogPostInput, BlogPostPage, WriteOutcome};

#[derive(Debug, Default, Deserialize)]
pub struct BlogPostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub published: bool,
}

impl BlogPostRequest {
    fn into_input(self) -> Result<BlogPostInput, ApiError> {
        require_text(&self.content, "Content")?;

        Ok(BlogPostInput {
            title: require_text(&self.title, "Title")?.to_string(),
            excerpt: self.excerpt.unwrap_or_default(),
            content: self.content,
            image: self.image.unwrap_or_default(),
            author: require_text(&self.author, "Author")?.to_string(),
            published: self.published,
        })
    }
}

fn list_response(page: u64, limit: u64, result: BlogPostPage) -> Json<BlogListResponse> {
    Json(BlogListResponse {
        success: true,
        posts: result.posts.into_iter().map(BlogPostDto::from).collect(),
        total: result.total,
        pagination: Pagination::new(page, limit, result.total),
    })
}

/// GET /blog
pub async fn list_published(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let (page, limit) = normalize_page(query.page, query.limit);
    let result = state.store().blog().list_published(page, limit).await?;
    Ok(list_response(page, limit, result))
}

/// GET /blog/admin/all
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let (page, limit) = normalize_page(query.page, query.limit);
    let result = state.store().blog().list_all(page, limit).await?;
    Ok(list_response(page, limit, result))
}

/// GET /blog/{id}
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let id = validate_id("Blog post", id)?;
    let post = state
        .store()
        .blog()
        .get_published(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post", id))?;

    Ok(Json(BlogPostResponse {
        success: true,
        post: post.into(),
    }))
}

/// POST /blog
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BlogPostRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let input = payload.into_input()?;
    let id = state.store().blog().create(input).await?;
    tracing::info!(id, "Blog post created");

    Ok(Json(CreatedResponse {
        message: "Blog post created successfully".to_string(),
        id,
    }))
}

/// PUT /blog/{id}
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<BlogPostRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = validate_id("Blog post", id)?;
    let input = payload.into_input()?;

    match state.store().blog().update(id, input).await? {
        WriteOutcome::Updated => Ok(Json(MessageResponse::new(
            "Blog post updated successfully",
        ))),
        WriteOutcome::NotFound => Err(ApiError::not_found("Blog post", id)),
    }
}

/// DELETE /blog/{id}
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = validate_id("Blog post", id)?;

    match state.store().blog().delete(id).await? {
        WriteOutcome::Updated => Ok(Json(MessageResponse::new(
            "Blog post deleted successfully",
        ))),
        WriteOutcome::NotFound => Err(ApiError::not_found("Blog post", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_requires_title_content_author() {
        let missing_author = BlogPostRequest {
            title: "T".into(),
            content: "C".into(),
            ..BlogPostRequest::default()
        };
        assert!(missing_author.into_input().is_err());
    }

    #[test]
    fn test_post_optional_fields_default_empty() {
        let input = BlogPostRequest {
            title: " Hello ".into(),
            content: "Body".into(),
            author: "Team".into(),
            ..BlogPostRequest::default()
        }
        .into_input()
        .unwrap();

        assert_eq!(input.title, "Hello");
        assert_eq!(input.excerpt, "");
        assert_eq!(input.image, "");
        assert!(!input.published);
    }
}
