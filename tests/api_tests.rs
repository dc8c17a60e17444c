use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Value, json};
use sitecms::api::AppState;
use sitecms::config::Config;
use sitecms::entities::users;
use sitecms::models::Role;
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-with-at-least-32-bytes";

fn test_config() -> Config {
    let db_path = std::env::temp_dir().join(format!("sitecms-api-test-{}.db", uuid::Uuid::new_v4()));
    let uploads = std::env::temp_dir().join(format!("sitecms-api-uploads-{}", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.uploads_path = uploads.to_string_lossy().into_owned();
    config.security.jwt_secret = Some(TEST_SECRET.to_string());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

async fn spawn_app() -> (Router, Arc<AppState>) {
    let state = sitecms::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    (sitecms::api::router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::String(
            String::from_utf8_lossy(&body).into_owned(),
        ))
    };
    (status, json)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"username": username, "password": password}),
        ),
    )
    .await
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = login(app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let (app, _) = spawn_app().await;

    for uri in ["/api/health", "/api/no-such-route"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(
            headers["referrer-policy"],
            "strict-origin-when-cross-origin"
        );
    }
}

#[tokio::test]
async fn test_login_with_seeded_admin() {
    let (app, _) = spawn_app().await;

    let (status, body) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");

    let token = body["token"].as_str().unwrap();
    let (status, body) = send(&app, get("/api/auth/verify", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_login_failures() {
    let (app, _) = spawn_app().await;

    let (status, body) = login(&app, "admin", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, _) = login(&app, "nobody", "admin123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/login", None, &json!({"username": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verify_distinguishes_missing_and_invalid_tokens() {
    let (app, _) = spawn_app().await;

    let (status, _) = send(&app, get("/api/auth/verify", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/api/auth/verify", Some("not.a.token"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_change_password_flow() {
    let (app, _) = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            &json!({"currentPassword": "admin123", "newPassword": "abc"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            &json!({"currentPassword": "wrong-one", "newPassword": "abcdef"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            &json!({"currentPassword": "admin123", "newPassword": "abcdef"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&app, "admin", "abcdef").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_for_vanished_account() {
    let (app, state) = spawn_app().await;

    let hash = state.shared.hasher.hash("viewer-pass").await.unwrap();
    state
        .store()
        .users()
        .create("viewer", &hash, Role::User)
        .await
        .unwrap();
    let (_, body) = login(&app, "viewer", "viewer-pass").await;
    let token = body["token"].as_str().unwrap().to_string();

    users::Entity::delete_many()
        .filter(users::Column::Username.eq("viewer"))
        .exec(&state.store().conn)
        .await
        .unwrap();

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            &json!({"currentPassword": "viewer-pass", "newPassword": "abcdef"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reset_admin_password_requires_admin_role() {
    let (app, state) = spawn_app().await;

    let hash = state.shared.hasher.hash("viewer-pass").await.unwrap();
    state
        .store()
        .users()
        .create("viewer", &hash, Role::User)
        .await
        .unwrap();

    let (status, body) = login(&app, "viewer", "viewer-pass").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user");
    let viewer_token = body["token"].as_str().unwrap().to_string();

    let reset = |token: Option<String>| {
        json_request(
            "POST",
            "/api/auth/reset-admin-password",
            token.as_deref(),
            &json!({"newPassword": "abcdef"}),
        )
    };

    let (status, _) = send(&app, reset(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, reset(Some(viewer_token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin privileges required");

    let (status, _) = send(&app, reset(Some(admin_token(&app).await))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = login(&app, "admin", "abcdef").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seeded_content_sections() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, get("/api/cms/content", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["hero"]["title"].is_string());
    assert!(body["about"]["companyName"].is_string());

    let (status, _) = send(&app, get("/api/cms/content/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_upsert_round_trip() {
    let (app, _) = spawn_app().await;
    let token = admin_token(&app).await;

    let document = json!({"headline": "New", "items": [1, 2, 3], "nested": {"ok": true}});

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/cms/content/services",
            None,
            &json!({"data": document}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/cms/content/services",
            Some(&token),
            &json!({"data": document}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["section"], "services");
    let first_id = body["id"].clone();

    let (status, body) = send(&app, get("/api/cms/content/services", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, document);

    let replacement = json!({"headline": "Replaced"});
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/cms/content/services",
            Some(&token),
            &json!({"data": replacement}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], first_id);

    let (_, body) = send(&app, get("/api/cms/content/services", None)).await;
    assert_eq!(body, replacement);
}

#[tokio::test]
async fn test_content_accepts_dotted_and_non_ascii_sections() {
    let (app, _) = spawn_app().await;
    let token = admin_token(&app).await;

    for (uri, section) in [
        ("/api/cms/content/hero.en", "hero.en"),
        ("/api/cms/content/%E5%85%B3%E4%BA%8E", "关于"),
    ] {
        let document = json!({"title": section});
        let (status, body) = send(
            &app,
            json_request("PUT", uri, Some(&token), &json!({"data": document})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["section"], section);

        let (status, body) = send(&app, get(uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, document);
    }

    let (status, _) = send(&app, get("/api/cms/content/no.such", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_rejects_empty_data() {
    let (app, _) = spawn_app().await;
    let token = admin_token(&app).await;

    for payload in [
        json!({}),
        json!({"data": null}),
        json!({"data": ""}),
        json!({"data": false}),
        json!({"data": 0}),
    ] {
        let (status, _) = send(
            &app,
            json_request("PUT", "/api/cms/content/hero", Some(&token), &payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_corrupt_section_fails_get_all() {
    let (app, state) = spawn_app().await;

    state
        .store()
        .content()
        .upsert("broken", "{not json")
        .await
        .unwrap();

    let (status, body) = send(&app, get("/api/cms/content", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().contains("broken"));

    let (status, _) = send(&app, get("/api/cms/content/hero", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_requires_admin() {
    let (app, _) = spawn_app().await;

    let (status, _) = send(&app, get("/api/metrics", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = admin_token(&app).await;
    let (status, _) = send(&app, get("/api/metrics", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_secret_fails_fast() {
    let mut config = test_config();
    config.security.jwt_secret = None;

    let result = sitecms::api::create_app_state_from_config(config, None).await;
    assert!(result.is_err());
}
