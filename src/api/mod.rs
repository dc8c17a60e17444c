use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod blog;
mod content;
mod error;
mod forms;
mod observability;
mod system;
mod types;
mod upload;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{AuthService, ContentService, FormService, UploadService};
use metrics_exporter_prometheus::PrometheusHandle;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn content_service(&self) -> &Arc<dyn ContentService> {
        &self.shared.content_service
    }

    #[must_use]
    pub fn form_service(&self) -> &Arc<FormService> {
        &self.shared.form_service
    }

    #[must_use]
    pub fn upload_service(&self) -> &Arc<UploadService> {
        &self.shared.upload_service
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

/// Builds the state and runs the bootstrap seeder.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    shared.seeder().run().await?;
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let (uploads_path, cors_origins, max_upload_bytes) = {
        let config = state.config();
        (
            config.server.uploads_path.clone(),
            config.server.cors_allowed_origins.clone(),
            config.server.max_upload_bytes,
        )
    };

    let api_router = Router::new()
        .merge(create_public_router())
        .merge(create_protected_router(state.clone(), max_upload_bytes))
        .merge(create_admin_router(state.clone()))
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service("/uploads", ServeDir::new(uploads_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
        .route("/cms/content", get(content::get_all_content))
        .route("/cms/content/{section}", get(content::get_section))
        .route("/contact", post(forms::submit_contact))
        .route("/training", post(forms::submit_training))
        .route("/jobs", post(forms::submit_job))
        .route("/blog", get(blog::list_published))
        .route("/blog/{id}", get(blog::get_post))
}

fn create_protected_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/verify", get(auth::verify))
        .route("/auth/change-password", post(auth::change_password))
        .route("/cms/content/{section}", put(content::update_section))
        .route(
            "/cms/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
        .route("/cms/contacts", get(forms::list_contacts))
        .route("/cms/contacts/{id}", delete(forms::delete_contact))
        .route(
            "/cms/training-applications",
            get(forms::list_training_applications),
        )
        .route(
            "/cms/training-applications/{id}",
            delete(forms::delete_training_application),
        )
        .route("/cms/job-applications", get(forms::list_job_applications))
        .route(
            "/cms/job-applications/{id}",
            delete(forms::delete_job_application),
        )
        .route("/blog/admin/all", get(blog::list_all))
        .route("/blog", post(blog::create_post))
        .route("/blog/{id}", put(blog::update_post))
        .route("/blog/{id}", delete(blog::delete_post))
        .route_layer(middleware::from_fn_with_state(state, auth::require_token))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/auth/reset-admin-password",
            post(auth::reset_admin_password),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}
