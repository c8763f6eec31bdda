//! Widget instance entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use folio_core::types::{DbId, Timestamp};

/// A row from the `widget_instances` table.
///
/// `key` is the layout id referencing this row from
/// `page_layouts.layout` (`"identity"` or `"{type}-{uuid}"`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WidgetInstance {
    pub id: DbId,
    pub page_id: DbId,
    pub key: String,
    pub widget_type_id: DbId,
    pub props: serde_json::Value,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A widget instance joined with its type key, as read back on load.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WidgetInstanceWithType {
    pub id: DbId,
    pub page_id: DbId,
    pub key: String,
    pub widget_type_id: DbId,
    pub type_key: String,
    pub props: serde_json::Value,
    pub enabled: bool,
}

/// Values for one row in a bulk insert.
#[derive(Debug, Clone)]
pub struct NewWidgetInstance {
    pub key: String,
    pub widget_type_id: DbId,
    pub props: serde_json::Value,
}
