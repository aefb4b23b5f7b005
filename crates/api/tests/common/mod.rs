#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use kiss_api::auth::jwt::JwtConfig;
use kiss_api::auth::password::hash_password;
use kiss_api::config::ServerConfig;
use kiss_api::router::build_app_router;
use kiss_api::state::AppState;
use kiss_db::models::unit::{CreateUnit, CreateUnitType};
use kiss_db::models::user::CreateUser;
use kiss_db::repositories::{UnitRepo, UnitTypeRepo, UserRepo};
use kiss_events::EventBus;

/// Role ids from the migration seed: 1 = superadmin, 2 = admin, 3 = staff.
pub const ROLE_ID_SUPERADMIN: i64 = 1;
pub const ROLE_ID_ADMIN: i64 = 2;
pub const ROLE_ID_STAFF: i64 = 3;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        escalation_sweep_interval_secs: 900,
        public_base_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604_800,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return the row plus the
/// plaintext password.
pub async fn create_test_user(
    pool: &PgPool,
    username: &str,
    role_id: i64,
    unit_id: Option<i64>,
) -> (kiss_db::models::user::User, String) {
    let password = "test_password_123";
    let hashed = hash_password(password).expect("hashing should succeed");
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hashed,
        role_id,
        unit_id,
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    (user, password.to_string())
}

/// Create a unit type and a unit under it, returning the unit id.
pub async fn create_test_unit(pool: &PgPool, name: &str, code: &str) -> i64 {
    let unit_type = UnitTypeRepo::create(
        pool,
        &CreateUnitType {
            name: format!("{name} type"),
            description: None,
        },
    )
    .await
    .expect("unit type creation should succeed");

    let unit = UnitRepo::create(
        pool,
        &CreateUnit {
            name: name.to_string(),
            code: code.to_string(),
            unit_type_id: unit_type.id,
        },
    )
    .await
    .expect("unit creation should succeed");
    unit.id
}

/// Log in via the API and return the access token.
pub async fn login_token(app: Router, username: &str, password: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}
