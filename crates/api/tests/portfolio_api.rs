//! Integration tests for portfolio creation, listing, and lifecycle.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, expect_status, request_as};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_portfolio_returns_201_with_slug(pool: PgPool) {
    let app = build_test_app(pool);

    let response = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Jane's Studio" })),
    )
    .await;

    let body = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["name"], "Jane's Studio");
    assert_eq!(body["data"]["slug"], "janes-studio");
    assert_eq!(body["data"]["description"], "Jane's Studio's portfolio");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_bootstraps_main_page_and_empty_layout(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Studio" })),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let portfolio_id = body["data"]["id"].as_i64().unwrap();

    let (page_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM pages WHERE portfolio_id = $1 AND key = 'main'")
            .bind(portfolio_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(page_count, 1);

    let (layout,): (serde_json::Value,) = sqlx::query_as(
        "SELECT pl.layout FROM page_layouts pl \
         JOIN pages p ON p.id = pl.page_id \
         WHERE p.portfolio_id = $1",
    )
    .bind(portfolio_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(layout["left"]["widgets"], json!([]));
    assert_eq!(layout["right"]["widgets"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn slug_collision_falls_back_to_numeric_suffix(pool: PgPool) {
    // Occupy the base slug with another user's portfolio.
    sqlx::query(
        "INSERT INTO portfolios (user_id, name, slug, description) \
         VALUES (99, 'Studio', 'studio', '')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let app = build_test_app(pool);
    let response = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Studio" })),
    )
    .await;

    let body = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["slug"], "studio-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generic_names_get_a_friendly_slug(pool: PgPool) {
    let app = build_test_app(pool);

    let response = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "My Portfolio" })),
    )
    .await;

    let body = expect_status(response, StatusCode::CREATED).await;
    let slug = body["data"]["slug"].as_str().unwrap();
    // "adjective-noun" from the friendly-name pools, never "my-portfolio".
    assert_ne!(slug, "my-portfolio");
    assert!(slug.contains('-'), "friendly slug is two words: {slug}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_community_portfolio_is_rejected_with_409(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let first = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Club Page", "community_id": 5 })),
    )
    .await;
    expect_status(first, StatusCode::CREATED).await;

    let app = build_test_app(pool);
    let second = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Another Club Page", "community_id": 5 })),
    )
    .await;

    let body = expect_status(second, StatusCode::CONFLICT).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ensure_is_idempotent_across_calls(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let first = request_as(app, 7, "POST", "/api/v1/portfolios/ensure", None).await;
    let first_body = expect_status(first, StatusCode::OK).await;
    assert_eq!(first_body["data"]["isNew"], true);
    let id = first_body["data"]["portfolioId"].as_i64().unwrap();

    let app = build_test_app(pool);
    let second = request_as(app, 7, "POST", "/api/v1/portfolios/ensure", None).await;
    let second_body = expect_status(second, StatusCode::OK).await;
    assert_eq!(second_body["data"]["isNew"], false);
    assert_eq!(second_body["data"]["portfolioId"].as_i64().unwrap(), id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_scoped_to_the_authenticated_user(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let mine = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Mine" })),
    )
    .await;
    expect_status(mine, StatusCode::CREATED).await;

    let app = build_test_app(pool.clone());
    let theirs = request_as(
        app,
        2,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Theirs" })),
    )
    .await;
    expect_status(theirs, StatusCode::CREATED).await;

    let app = build_test_app(pool);
    let response = request_as(app, 1, "GET", "/api/v1/portfolios", None).await;
    let body = expect_status(response, StatusCode::OK).await;

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Mine");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn another_users_portfolio_is_forbidden(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let created = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Mine" })),
    )
    .await;
    let body = expect_status(created, StatusCode::CREATED).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let app = build_test_app(pool);
    let response = request_as(app, 2, "GET", &format!("/api/v1/portfolios/{id}"), None).await;
    expect_status(response, StatusCode::FORBIDDEN).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_nonpositive_id(pool: PgPool) {
    let app = build_test_app(pool);
    let response = request_as(
        app,
        1,
        "PATCH",
        "/api/v1/portfolios/0",
        Some(json!({ "name": "Renamed" })),
    )
    .await;

    let body = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_to_pages_and_widgets(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let created = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Doomed" })),
    )
    .await;
    let body = expect_status(created, StatusCode::CREATED).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let deleted = request_as(app, 1, "DELETE", &format!("/api/v1/portfolios/{id}"), None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let (pages,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pages WHERE portfolio_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(pages, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mandatory_community_template_is_attached(pool: PgPool) {
    sqlx::query(
        "INSERT INTO portfolio_templates \
             (community_id, name, layout, widget_configs, is_active, is_mandatory) \
         VALUES (3, 'Club Standard', \
                 '{\"left\":{\"type\":\"vertical\",\"widgets\":[\"identity\"]},\
                   \"right\":{\"type\":\"vertical\",\"widgets\":[]}}', \
                 '[]', true, true)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let app = build_test_app(pool.clone());
    let response = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Club Page", "community_id": 3 })),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;

    assert!(body["data"]["template_id"].is_i64());
}
