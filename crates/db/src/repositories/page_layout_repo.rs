//! Repository for the `page_layouts` table.
//!
//! One layout row per page, upserted on the unique `page_id` constraint.

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::page_layout::PageLayout;

const COLUMNS: &str = "id, page_id, layout, created_at, updated_at";

/// Provides data access for page layouts.
pub struct PageLayoutRepo;

impl PageLayoutRepo {
    /// Insert or replace the layout for a page.
    pub async fn upsert(
        pool: &PgPool,
        page_id: DbId,
        layout: &serde_json::Value,
    ) -> Result<PageLayout, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_layouts (page_id, layout) \
             VALUES ($1, $2) \
             ON CONFLICT (page_id) DO UPDATE SET layout = EXCLUDED.layout \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageLayout>(&query)
            .bind(page_id)
            .bind(layout)
            .fetch_one(pool)
            .await
    }

    /// Find the layout for a page. `None` if nothing has been saved yet.
    pub async fn find_by_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Option<PageLayout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_layouts WHERE page_id = $1");
        sqlx::query_as::<_, PageLayout>(&query)
            .bind(page_id)
            .fetch_optional(pool)
            .await
    }
}
