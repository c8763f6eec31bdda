//! Repository for the `pages` table.

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::page::{Page, MAIN_PAGE_KEY};

const COLUMNS: &str = "id, portfolio_id, key, title, route, is_demo, created_at, updated_at";

/// Provides data access for portfolio pages.
pub struct PageRepo;

impl PageRepo {
    /// Create the main page for a portfolio (`key "main"`, route `/`).
    pub async fn create_main(
        pool: &PgPool,
        portfolio_id: DbId,
        title: &str,
    ) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (portfolio_id, key, title, route) \
             VALUES ($1, $2, $3, '/') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(portfolio_id)
            .bind(MAIN_PAGE_KEY)
            .bind(title)
            .fetch_one(pool)
            .await
    }

    /// Find a portfolio's main page.
    pub async fn find_main(
        pool: &PgPool,
        portfolio_id: DbId,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE portfolio_id = $1 AND key = $2");
        sqlx::query_as::<_, Page>(&query)
            .bind(portfolio_id)
            .bind(MAIN_PAGE_KEY)
            .fetch_optional(pool)
            .await
    }
}
