//! Page entity model.

use serde::Serialize;
use sqlx::FromRow;

use folio_core::types::{DbId, Timestamp};

/// Key of the page every portfolio renders by default.
pub const MAIN_PAGE_KEY: &str = "main";

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub portfolio_id: DbId,
    pub key: String,
    pub title: String,
    pub route: String,
    pub is_demo: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
