//! First-run bootstrap, safe to run on every start.
//!
//! Never resets an existing password and never overwrites an existing section.

use anyhow::{Context, Result};
use tracing::info;

use crate::constants::bootstrap::{ADMIN_PASSWORD, ADMIN_USERNAME};
use crate::constants::content::DEFAULT_SECTIONS;
use crate::db::Store;
use crate::models::Role;
use crate::services::password::PasswordHasher;
use crate::services::seed_data;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub sections_created: usize,
    pub blog_posts_created: usize,
}

pub struct Seeder {
    store: Store,
    hasher: PasswordHasher,
}

impl Seeder {
    #[must_use]
    pub const fn new(store: Store, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Schema is ensured by `Store` construction (migrations run there).
    pub async fn run(&self) -> Result<SeedReport> {
        let mut report = SeedReport {
            admin_created: self.ensure_admin().await?,
            ..SeedReport::default()
        };

        for section in DEFAULT_SECTIONS {
            let document = seed_data::default_section(section).unwrap_or_default();
            let data = serde_json::to_string(&document)?;
            if self
                .store
                .content()
                .insert_if_absent(section, &data)
                .await?
            {
                report.sections_created += 1;
            }
        }

        report.blog_posts_created = self.ensure_blog_posts().await?;

        info!(
            admin_created = report.admin_created,
            sections_created = report.sections_created,
            blog_posts_created = report.blog_posts_created,
            "Bootstrap complete"
        );

        Ok(report)
    }

    async fn ensure_admin(&self) -> Result<bool> {
        if self
            .store
            .users()
            .find_by_username(ADMIN_USERNAME)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let hash = self
            .hasher
            .hash(ADMIN_PASSWORD)
            .await
            .context("Failed to hash bootstrap admin password")?;

        let outcome = self
            .store
            .users()
            .create(ADMIN_USERNAME, &hash, Role::Admin)
            .await?;

        if outcome.created {
            info!(
                user_id = outcome.id,
                "Created default admin account; change its password"
            );
        }

        Ok(outcome.created)
    }

    /// Demo posts only go into an empty blog.
    async fn ensure_blog_posts(&self) -> Result<usize> {
        if self.store.blog().count().await? > 0 {
            return Ok(0);
        }

        let posts = seed_data::default_blog_posts();
        let count = posts.len();
        for post in posts {
            self.store.blog().create(post).await?;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::db::repositories::user::AccountKey;

    async fn temp_store() -> Store {
        let db_path =
            std::env::temp_dir().join(format!("sitecms-seed-test-{}.db", uuid::Uuid::new_v4()));
        Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap()
    }

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(&SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_run_creates_admin_and_defaults() {
        let store = temp_store().await;
        let hasher = fast_hasher();
        let report = Seeder::new(store.clone(), hasher.clone())
            .run()
            .await
            .unwrap();

        assert!(report.admin_created);
        assert_eq!(report.sections_created, DEFAULT_SECTIONS.len());
        assert_eq!(report.blog_posts_created, 3);

        let admin = store
            .users()
            .find_by_username(ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(hasher.verify(ADMIN_PASSWORD, &admin.password_hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_second_run_changes_nothing() {
        let store = temp_store().await;
        let hasher = fast_hasher();
        let seeder = Seeder::new(store.clone(), hasher.clone());
        seeder.run().await.unwrap();

        let new_hash = hasher.hash("abcdef").await.unwrap();
        store
            .users()
            .update_password(AccountKey::Username(ADMIN_USERNAME), &new_hash)
            .await
            .unwrap();
        store.content().upsert("hero", r#"{"title":"X"}"#).await.unwrap();

        let report = seeder.run().await.unwrap();
        assert_eq!(report, SeedReport::default());

        assert_eq!(store.users().count_with_role(Role::Admin).await.unwrap(), 1);
        let admin = store
            .users()
            .find_by_username(ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert!(hasher.verify("abcdef", &admin.password_hash).await.unwrap());
        assert!(!hasher.verify(ADMIN_PASSWORD, &admin.password_hash).await.unwrap());

        let hero = store.content().get("hero").await.unwrap().unwrap();
        assert_eq!(hero.data, r#"{"title":"X"}"#);
        assert_eq!(store.blog().count().await.unwrap(), 3);
    }
}
