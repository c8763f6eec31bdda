//! Portfolio template entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use folio_core::types::{DbId, Timestamp};

/// A row from the `portfolio_templates` table.
///
/// `layout` holds the two-column wire shape; `widget_configs` is an
/// array of `{id, type, props}` entries materialized into
/// `widget_instances` on a template-born portfolio's first save.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PortfolioTemplate {
    pub id: DbId,
    pub community_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub layout: serde_json::Value,
    pub widget_configs: serde_json::Value,
    pub preview_image_url: Option<String>,
    pub is_active: bool,
    pub is_mandatory: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One entry of a template's `widget_configs` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateWidgetConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub type_key: String,
    #[serde(default)]
    pub props: serde_json::Value,
}
