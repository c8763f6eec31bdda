//! Page layout entity model.

use serde::Serialize;
use sqlx::FromRow;

use folio_core::types::{DbId, Timestamp};

/// A row from the `page_layouts` table.
///
/// `layout` holds the two-column wire shape
/// (`folio_core::builder::LayoutJson`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageLayout {
    pub id: DbId,
    pub page_id: DbId,
    pub layout: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
