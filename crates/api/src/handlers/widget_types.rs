//! Handlers for the widget type catalog.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use folio_core::registry::{WidgetType, ALL_WIDGET_TYPES};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One catalog entry: the registry definition plus its database id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: i64,
    pub key: &'static str,
    pub display_name: &'static str,
    pub default_content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_style: Option<Value>,
}

/// GET /api/v1/widget-types
///
/// The catalog the "add widget" picker renders: every registered
/// widget type with its defaults, in catalog order.
pub async fn list_widget_types(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CatalogEntry>>>> {
    let rows = folio_db::repositories::WidgetTypeRepo::list(&state.pool).await?;

    let entries = rows
        .into_iter()
        .filter_map(|row| {
            let t = WidgetType::from_key(&row.key)?;
            Some(CatalogEntry {
                id: row.id,
                key: t.key(),
                display_name: t.display_name(),
                default_content: t.default_content(),
                default_style: t.default_style(),
            })
        })
        .collect::<Vec<_>>();

    if entries.len() != ALL_WIDGET_TYPES.len() {
        tracing::warn!(
            seeded = entries.len(),
            registered = ALL_WIDGET_TYPES.len(),
            "widget type catalog and database seed disagree"
        );
    }
    Ok(Json(DataResponse { data: entries }))
}
