//! Integration tests for builder load/save, sessions, identity props,
//! templates, and the widget catalog.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, expect_status, request_as};
use serde_json::json;
use sqlx::PgPool;

async fn create_portfolio(pool: &PgPool, user_id: i64, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = request_as(
        app,
        user_id,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": name })),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_then_load_round_trips_layout_and_content(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    let app = build_test_app(pool.clone());
    let save = request_as(
        app,
        1,
        "PUT",
        &format!("/api/v1/portfolios/{id}/layout"),
        Some(json!({
            "leftWidgets": [
                { "id": "identity", "type": "identity" },
                { "id": "description-aaaa", "type": "description" },
            ],
            "rightWidgets": [
                { "id": "projects-bbbb", "type": "projects" },
            ],
            "widgetContent": {
                "identity": { "name": "Jane", "handle": "jane" },
                "projects-bbbb": { "title": "Projects", "items": [] },
            },
        })),
    )
    .await;
    assert_eq!(save.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool);
    let load = request_as(app, 1, "GET", &format!("/api/v1/portfolios/{id}/builder"), None).await;
    let body = expect_status(load, StatusCode::OK).await;
    let data = &body["data"];

    assert_eq!(data["leftWidgets"][0]["id"], "identity");
    assert_eq!(data["leftWidgets"][1]["id"], "description-aaaa");
    assert_eq!(data["rightWidgets"][0]["type"], "projects");
    assert_eq!(data["widgetContent"]["identity"]["name"], "Jane");
    // Widgets saved without content come back with empty props.
    assert_eq!(data["widgetContent"]["description-aaaa"], json!({}));
    assert_eq!(data["isFromTemplate"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_replaces_previous_instances_completely(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    for widgets in [
        json!([
            { "id": "identity", "type": "identity" },
            { "id": "gallery-1111", "type": "gallery" },
        ]),
        json!([
            { "id": "identity", "type": "identity" },
        ]),
    ] {
        let app = build_test_app(pool.clone());
        let save = request_as(
            app,
            1,
            "PUT",
            &format!("/api/v1/portfolios/{id}/layout"),
            Some(json!({ "leftWidgets": widgets, "rightWidgets": [] })),
        )
        .await;
        assert_eq!(save.status(), StatusCode::NO_CONTENT);
    }

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM widget_instances wi \
         JOIN pages p ON p.id = wi.page_id WHERE p.portfolio_id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1, "the gallery row from the first save must be gone");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_widget_type_in_payload_is_rejected(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    let app = build_test_app(pool);
    let save = request_as(
        app,
        1,
        "PUT",
        &format!("/api/v1/portfolios/{id}/layout"),
        Some(json!({
            "leftWidgets": [{ "id": "hologram-1", "type": "hologram" }],
            "rightWidgets": [],
        })),
    )
    .await;

    assert_eq!(save.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_skips_layout_keys_with_unresolvable_types(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    sqlx::query(
        "UPDATE page_layouts SET layout = \
            '{\"left\":{\"type\":\"vertical\",\"widgets\":[\"identity\",\"hologram-1\"]},\
              \"right\":{\"type\":\"vertical\",\"widgets\":[]}}' \
         WHERE page_id = (SELECT id FROM pages WHERE portfolio_id = $1)",
    )
    .bind(id)
    .execute(&pool)
    .await
    .unwrap();

    let app = build_test_app(pool);
    let load = request_as(app, 1, "GET", &format!("/api/v1/portfolios/{id}/builder"), None).await;
    let body = expect_status(load, StatusCode::OK).await;

    let left = body["data"]["leftWidgets"].as_array().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0]["id"], "identity");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn template_portfolio_loads_from_template_without_writing(pool: PgPool) {
    sqlx::query(
        "INSERT INTO portfolio_templates \
             (community_id, name, layout, widget_configs, is_active, is_mandatory) \
         VALUES (3, 'Club Standard', \
                 '{\"left\":{\"type\":\"vertical\",\"widgets\":[\"identity\",\"description-t1\"]},\
                   \"right\":{\"type\":\"vertical\",\"widgets\":[]}}', \
                 '[{\"id\":\"description-t1\",\"type\":\"description\",\
                    \"props\":{\"title\":\"About the Club\"}}]', \
                 true, true)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let app = build_test_app(pool.clone());
    let created = request_as(
        app,
        1,
        "POST",
        "/api/v1/portfolios",
        Some(json!({ "name": "Club Page", "community_id": 3 })),
    )
    .await;
    let body = expect_status(created, StatusCode::CREATED).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let load = request_as(app, 1, "GET", &format!("/api/v1/portfolios/{id}/builder"), None).await;
    let body = expect_status(load, StatusCode::OK).await;
    let data = &body["data"];

    assert_eq!(data["isFromTemplate"], true);
    assert_eq!(data["leftWidgets"][1]["id"], "description-t1");
    assert_eq!(
        data["widgetContent"]["description-t1"]["title"],
        "About the Club"
    );

    // The load is a pure read: nothing materialized yet.
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM widget_instances wi \
         JOIN pages p ON p.id = wi.page_id WHERE p.portfolio_id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn identity_put_clamps_theme_and_leaves_other_widgets_alone(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    let app = build_test_app(pool.clone());
    let save = request_as(
        app,
        1,
        "PUT",
        &format!("/api/v1/portfolios/{id}/layout"),
        Some(json!({
            "leftWidgets": [
                { "id": "identity", "type": "identity" },
                { "id": "gallery-2222", "type": "gallery" },
            ],
            "rightWidgets": [],
            "widgetContent": { "gallery-2222": { "title": "Gallery", "groups": [] } },
        })),
    )
    .await;
    assert_eq!(save.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool.clone());
    let put = request_as(
        app,
        1,
        "PUT",
        &format!("/api/v1/portfolios/{id}/identity"),
        Some(json!({ "name": "Jane", "handle": "@jane", "selectedColor": 42 })),
    )
    .await;
    let body = expect_status(put, StatusCode::OK).await;
    assert_eq!(body["data"]["selectedColor"], 6);

    let app = build_test_app(pool);
    let load = request_as(app, 1, "GET", &format!("/api/v1/portfolios/{id}/builder"), None).await;
    let body = expect_status(load, StatusCode::OK).await;
    assert_eq!(body["data"]["widgetContent"]["gallery-2222"]["title"], "Gallery");
    assert_eq!(body["data"]["widgetContent"]["identity"]["name"], "Jane");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_ops_apply_and_close_flushes(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    let app = build_test_app(pool.clone());
    let opened = request_as(
        app.clone(),
        1,
        "POST",
        &format!("/api/v1/portfolios/{id}/builder/session"),
        None,
    )
    .await;
    let body = expect_status(opened, StatusCode::OK).await;
    assert_eq!(body["data"]["leftWidgets"][0]["id"], "identity");

    let added = request_as(
        app.clone(),
        1,
        "POST",
        &format!("/api/v1/portfolios/{id}/builder/ops"),
        Some(json!({ "op": "add_widget", "widget_type": "projects", "column": "right" })),
    )
    .await;
    let body = expect_status(added, StatusCode::OK).await;
    let new_id = body["data"]["addedWidgetId"].as_str().unwrap().to_string();
    assert!(new_id.starts_with("projects-"));
    assert_eq!(body["data"]["rightWidgets"][0]["id"], new_id);

    // Identity cannot be deleted; the op is a silent no-op.
    let deleted = request_as(
        app.clone(),
        1,
        "POST",
        &format!("/api/v1/portfolios/{id}/builder/ops"),
        Some(json!({ "op": "delete_widget", "id": "identity" })),
    )
    .await;
    let body = expect_status(deleted, StatusCode::OK).await;
    assert_eq!(body["data"]["leftWidgets"][0]["id"], "identity");

    let closed = request_as(
        app,
        1,
        "DELETE",
        &format!("/api/v1/portfolios/{id}/builder/session"),
        None,
    )
    .await;
    assert_eq!(closed.status(), StatusCode::NO_CONTENT);

    // The close flushed: the added widget is in the database.
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM widget_instances wi \
         JOIN pages p ON p.id = wi.page_id \
         WHERE p.portfolio_id = $1 AND wi.key = $2",
    )
    .bind(id)
    .bind(&new_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn close_flush_publishes_identity_update(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    let (app, state) = common::build_test_app_with_state(pool);
    let mut rx = state.event_bus.subscribe();

    let opened = request_as(
        app.clone(),
        1,
        "POST",
        &format!("/api/v1/portfolios/{id}/builder/session"),
        None,
    )
    .await;
    expect_status(opened, StatusCode::OK).await;

    let edited = request_as(
        app.clone(),
        1,
        "POST",
        &format!("/api/v1/portfolios/{id}/builder/ops"),
        Some(json!({
            "op": "set_content",
            "id": "identity",
            "content": { "name": "Jane", "selectedColor": 2 }
        })),
    )
    .await;
    expect_status(edited, StatusCode::OK).await;

    let closed = request_as(
        app,
        1,
        "DELETE",
        &format!("/api/v1/portfolios/{id}/builder/session"),
        None,
    )
    .await;
    assert_eq!(closed.status(), StatusCode::NO_CONTENT);

    // The close-flush carried identity content, so both events fire.
    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert_eq!(event.portfolio_id, Some(id));
        seen.push(event.event_type);
    }
    assert!(seen.contains(&"portfolio.updated".to_string()));
    assert!(seen.contains(&"portfolio.identity_updated".to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_opens_share_one_session(pool: PgPool) {
    use folio_api::service::sessions::{BuilderOp, BuilderSessions};
    use folio_core::builder::Column;

    let id = create_portfolio(&pool, 1, "Studio").await;
    let sessions = BuilderSessions::new();

    let (a, b) = tokio::join!(sessions.open(&pool, id), sessions.open(&pool, id));
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.left_widgets.len(), b.left_widgets.len());
    assert_eq!(a.left_widgets[0].id, "identity");

    // Both opens landed on the same live session: a mutation applied
    // once is visible on rejoin.
    let mutated = sessions
        .apply(
            id,
            BuilderOp::AddWidget {
                widget_type: "projects".into(),
                column: Column::Right,
            },
        )
        .await
        .unwrap();
    let added = mutated.added_widget_id.unwrap();

    let rejoined = sessions.open(&pool, id).await.unwrap();
    assert_eq!(rejoined.right_widgets.len(), 1);
    assert_eq!(rejoined.right_widgets[0].id, added);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_carries_identity_and_version(pool: PgPool) {
    let id = create_portfolio(&pool, 1, "Studio").await;

    let app = build_test_app(pool.clone());
    let save = request_as(
        app,
        1,
        "PUT",
        &format!("/api/v1/portfolios/{id}/layout"),
        Some(json!({
            "leftWidgets": [{ "id": "identity", "type": "identity" }],
            "rightWidgets": [],
            "widgetContent": { "identity": { "name": "Jane", "handle": "jane" } },
        })),
    )
    .await;
    assert_eq!(save.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool);
    let export = request_as(app, 1, "GET", &format!("/api/v1/portfolios/{id}/export"), None).await;
    let body = expect_status(export, StatusCode::OK).await;

    assert_eq!(body["identity"]["name"], "Jane");
    assert_eq!(body["metadata"]["version"], "1.0.0");
    assert!(body["metadata"]["createdAt"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn widget_catalog_lists_all_seeded_types(pool: PgPool) {
    let app = build_test_app(pool);
    let response = request_as(app, 1, "GET", "/api/v1/widget-types", None).await;
    let body = expect_status(response, StatusCode::OK).await;

    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0]["key"], "identity");
    assert!(entries.iter().any(|e| e["key"] == "meeting-scheduler"));
}
