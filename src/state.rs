use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ContentService, FormService, PasswordHasher, SeaOrmAuthService,
    SeaOrmContentService, Seeder, TokenService, UploadService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub hasher: PasswordHasher,

    pub auth_service: Arc<dyn AuthService>,

    pub content_service: Arc<dyn ContentService>,

    pub form_service: Arc<FormService>,

    pub upload_service: Arc<UploadService>,
}

impl SharedState {
    /// Opens the store and builds every service once.
    ///
    /// Fails when the configuration has no usable signing secret.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let hasher = PasswordHasher::new(&config.security)?;
        let tokens = TokenService::new(config.jwt_secret()?, config.security.token_ttl_hours);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            hasher.clone(),
            tokens,
            config.security.min_password_length,
        )) as Arc<dyn AuthService>;

        let content_service =
            Arc::new(SeaOrmContentService::new(store.clone())) as Arc<dyn ContentService>;

        let form_service = Arc::new(FormService::new(store.clone()));
        let upload_service = Arc::new(UploadService::new(&config.server));

        Ok(Self {
            config: Arc::new(config),
            store,
            hasher,
            auth_service,
            content_service,
            form_service,
            upload_service,
        })
    }

    #[must_use]
    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.store.clone(), self.hasher.clone())
    }
}
