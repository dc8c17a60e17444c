use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    Set,
};

use crate::db::WriteOutcome;
use crate::entities::{blog_posts, prelude::*};

#[derive(Debug, Clone, Default)]
pub struct BlogPostInput {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image: String,
    pub author: String,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct BlogPostPage {
    pub posts: Vec<blog_posts::Model>,
    pub total: u64,
}

pub struct BlogRepository {
    conn: DatabaseConnection,
}

impl BlogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn newest_first(query: Select<BlogPosts>) -> Select<BlogPosts> {
        query
            .order_by_desc(blog_posts::Column::CreatedAt)
            .order_by_desc(blog_posts::Column::Id)
    }

    async fn fetch_page(
        &self,
        query: Select<BlogPosts>,
        page: u64,
        limit: u64,
    ) -> Result<BlogPostPage> {
        let paginator = Self::newest_first(query).paginate(&self.conn, limit);
        let total = paginator
            .num_items()
            .await
            .context("Failed to count blog posts")?;
        let posts = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .context("Failed to fetch blog posts")?;

        Ok(BlogPostPage { posts, total })
    }

    /// `page` is 1-based.
    pub async fn list_published(&self, page: u64, limit: u64) -> Result<BlogPostPage> {
        let query = BlogPosts::find().filter(blog_posts::Column::Published.eq(true));
        self.fetch_page(query, page, limit).await
    }

    pub async fn list_all(&self, page: u64, limit: u64) -> Result<BlogPostPage> {
        self.fetch_page(BlogPosts::find(), page, limit).await
    }

    pub async fn get_published(&self, id: i32) -> Result<Option<blog_posts::Model>> {
        BlogPosts::find_by_id(id)
            .filter(blog_posts::Column::Published.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query blog post")
    }

    pub async fn count(&self) -> Result<u64> {
        BlogPosts::find()
            .count(&self.conn)
            .await
            .context("Failed to count blog posts")
    }

    pub async fn create(&self, input: BlogPostInput) -> Result<i32> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = blog_posts::ActiveModel {
            title: Set(input.title),
            excerpt: Set(input.excerpt),
            content: Set(input.content),
            image: Set(input.image),
            author: Set(input.author),
            published: Set(input.published),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let res = BlogPosts::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to create blog post")?;
        Ok(res.last_insert_id)
    }

    pub async fn update(&self, id: i32, input: BlogPostInput) -> Result<WriteOutcome> {
        let active = blog_posts::ActiveModel {
            title: Set(input.title),
            excerpt: Set(input.excerpt),
            content: Set(input.content),
            image: Set(input.image),
            author: Set(input.author),
            published: Set(input.published),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = BlogPosts::update_many()
            .set(active)
            .filter(blog_posts::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update blog post")?;

        Ok(WriteOutcome::from_rows_affected(result.rows_affected))
    }

    pub async fn delete(&self, id: i32) -> Result<WriteOutcome> {
        let result = BlogPosts::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete blog post")?;

        Ok(WriteOutcome::from_rows_affected(result.rows_affected))
    }
}
