use serde::{Deserialize, Serialize};

use crate::db::BlogPost;

/// Failure envelope shared by every error response.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub error: String,
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgement of a newly stored row.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogPostDto {
    pub id: i32,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image: String,
    pub author: String,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BlogPost> for BlogPostDto {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            image: post.image,
            author: post.author,
            published: post.published,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogListResponse {
    pub success: bool,
    pub posts: Vec<BlogPostDto>,
    pub total: u64,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct BlogPostResponse {
    pub success: bool,
    pub post: BlogPostDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(2, 10, 11).pages, 2);
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }
}
