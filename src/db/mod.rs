use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::blog::{BlogPostInput, BlogPostPage};
pub use repositories::content::{ContentRepository, ContentSection};
pub use repositories::submissions::{ContactInput, JobApplicationInput, TrainingApplicationInput};
pub use repositories::user::{Account, UserRepository};

pub use crate::entities::blog_posts::Model as BlogPost;
pub use crate::entities::contacts::Model as Contact;
pub use crate::entities::job_applications::Model as JobApplication;
pub use crate::entities::training_applications::Model as TrainingApplication;

/// Result of a keyed update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Updated,
    NotFound,
}

impl WriteOutcome {
    #[must_use]
    pub const fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            Self::NotFound
        } else {
            Self::Updated
        }
    }
}

/// Owned handle to the single shared datastore.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Closes the pool. Called once on shutdown.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        info!("Database connection closed");
        Ok(())
    }

    #[must_use]
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn content(&self) -> ContentRepository {
        ContentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn submissions(&self) -> repositories::submissions::SubmissionRepository {
        repositories::submissions::SubmissionRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn blog(&self) -> repositories::blog::BlogRepository {
        repositories::blog::BlogRepository::new(self.conn.clone())
    }
}
