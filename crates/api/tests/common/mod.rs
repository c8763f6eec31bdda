//! Shared helpers for API integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use folio_api::auth::jwt::{generate_token, JwtConfig};
use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router against the given pool.
///
/// Mirrors `main.rs` so tests exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_state(pool).0
}

/// Like [`build_test_app`], but also hands back the state so a test
/// can subscribe to the event bus or reach the session service.
pub fn build_test_app_with_state(pool: PgPool) -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    let app = build_app_router(state.clone(), &config);
    (app, state)
}

/// A signed Bearer token for `user_id`, matching [`test_config`].
pub fn auth_token(user_id: DbId) -> String {
    generate_token(user_id, &test_config().jwt).expect("token generation")
}

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send an authenticated request with an optional JSON body.
pub async fn request_as(
    app: Router,
    user_id: DbId,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", auth_token(user_id)));

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Assert status and return the parsed body, printing it on mismatch.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}
