//! Handlers for the builder surface: load, save, sessions, identity
//! props, and export.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use folio_core::builder::{BuilderState, PortfolioExport, WidgetDef};
use folio_core::identity::IdentityContent;
use folio_core::registry::IDENTITY_WIDGET_ID;
use folio_core::types::DbId;
use folio_db::repositories::{PageRepo, WidgetInstanceRepo, WidgetTypeRepo};
use folio_events::PortfolioEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::service::builder_persistence::{self, LoadedPortfolio};
use crate::service::sessions::{BuilderOp, SessionView};
use crate::state::AppState;

/// Request body for `PUT /portfolios/{id}/layout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLayoutRequest {
    pub left_widgets: Vec<WidgetDef>,
    pub right_widgets: Vec<WidgetDef>,
    #[serde(default)]
    pub widget_content: HashMap<String, Value>,
}

/// GET /api/v1/portfolios/{id}/builder
///
/// Load the builder state for a portfolio. Template-born portfolios
/// with no saved rows are served from their template.
pub async fn load_builder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LoadedPortfolio>>> {
    verify_owner(&state, id, user.user_id).await?;
    let loaded = builder_persistence::load_portfolio_data(&state.pool, id).await?;
    Ok(Json(DataResponse { data: loaded }))
}

/// PUT /api/v1/portfolios/{id}/layout
///
/// Full-replace save of the page's layout and widget instances.
pub async fn save_layout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SaveLayoutRequest>,
) -> AppResult<StatusCode> {
    verify_owner(&state, id, user.user_id).await?;
    builder_persistence::save_widget_layout(
        &state.pool,
        id,
        &input.left_widgets,
        &input.right_widgets,
        &input.widget_content,
    )
    .await?;

    publish_saved(&state, id, user.user_id, &input.widget_content);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/portfolios/{id}/builder/session
pub async fn open_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionView>>> {
    verify_owner(&state, id, user.user_id).await?;
    let view = state.sessions.open(&state.pool, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/portfolios/{id}/builder/ops
pub async fn apply_op(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(op): Json<BuilderOp>,
) -> AppResult<Json<DataResponse<SessionView>>> {
    verify_owner(&state, id, user.user_id).await?;
    let view = state.sessions.apply(id, op).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/portfolios/{id}/builder/session
///
/// Flush the session's state synchronously and tear it down.
pub async fn close_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    verify_owner(&state, id, user.user_id).await?;
    if let Some(snapshot) = state.sessions.close(&state.pool, id).await? {
        publish_saved(&state, id, user.user_id, &snapshot.content);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/portfolios/{id}/identity
pub async fn get_identity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<IdentityContent>>> {
    verify_owner(&state, id, user.user_id).await?;
    let page = main_page(&state, id).await?;

    let identity = match WidgetInstanceRepo::find_by_key(&state.pool, page.id, IDENTITY_WIDGET_ID)
        .await?
    {
        Some(row) => serde_json::from_value(row.props).unwrap_or_default(),
        None => IdentityContent::default(),
    };
    Ok(Json(DataResponse { data: identity }))
}

/// PUT /api/v1/portfolios/{id}/identity
///
/// Targeted upsert of the identity widget's props; the rest of the
/// page is untouched. The theme index is clamped on deserialization.
pub async fn put_identity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<IdentityContent>,
) -> AppResult<Json<DataResponse<IdentityContent>>> {
    verify_owner(&state, id, user.user_id).await?;
    let page = main_page(&state, id).await?;

    let type_row = WidgetTypeRepo::find_by_key(&state.pool, IDENTITY_WIDGET_ID)
        .await?
        .ok_or_else(|| AppError::InternalError("identity widget type is not seeded".to_string()))?;

    let props = serde_json::to_value(&input)
        .map_err(|e| AppError::InternalError(format!("identity serialization failed: {e}")))?;
    let row = WidgetInstanceRepo::upsert(&state.pool, page.id, IDENTITY_WIDGET_ID, type_row.id, &props)
        .await?;

    state.event_bus.publish(
        PortfolioEvent::new("portfolio.identity_updated")
            .with_portfolio(id)
            .with_actor(user.user_id),
    );

    let stored = serde_json::from_value(row.props).unwrap_or_default();
    Ok(Json(DataResponse { data: stored }))
}

/// GET /api/v1/portfolios/{id}/export
///
/// The downloadable portfolio JSON: identity, both columns, metadata.
pub async fn export_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PortfolioExport>> {
    verify_owner(&state, id, user.user_id).await?;
    let loaded = builder_persistence::load_portfolio_data(&state.pool, id).await?;

    let identity = loaded
        .widget_content
        .get(IDENTITY_WIDGET_ID)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let state_model = BuilderState {
        left: loaded.left_widgets,
        right: loaded.right_widgets,
        ..Default::default()
    };
    Ok(Json(state_model.export(identity)))
}

fn publish_saved(state: &AppState, portfolio_id: DbId, user_id: DbId, content: &HashMap<String, Value>) {
    state.event_bus.publish(
        PortfolioEvent::new("portfolio.updated")
            .with_portfolio(portfolio_id)
            .with_actor(user_id),
    );
    if content.contains_key(IDENTITY_WIDGET_ID) {
        state.event_bus.publish(
            PortfolioEvent::new("portfolio.identity_updated")
                .with_portfolio(portfolio_id)
                .with_actor(user_id),
        );
    }
}

async fn verify_owner(state: &AppState, id: DbId, user_id: DbId) -> AppResult<()> {
    super::portfolios::find_owned(state, id, user_id).await.map(|_| ())
}

async fn main_page(state: &AppState, portfolio_id: DbId) -> AppResult<folio_db::models::Page> {
    use folio_core::CoreError;

    PageRepo::find_main(&state.pool, portfolio_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "no page found for portfolio {portfolio_id}; recreate the portfolio"
            )))
        })
}
