//! Widget type catalog row.

use serde::Serialize;
use sqlx::FromRow;

use folio_core::types::{DbId, Timestamp};

/// A row from the `widget_types` table.
///
/// Seeded by migration from the registry keys; `key` matches
/// `folio_core::registry::WidgetType::key()`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WidgetTypeRow {
    pub id: DbId,
    pub key: String,
    pub display_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
