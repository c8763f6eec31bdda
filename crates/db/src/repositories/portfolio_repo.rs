//! Repository for the `portfolios` table.

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::portfolio::{NewPortfolio, Portfolio, UpdatePortfolio};

/// Column list for `portfolios` queries.
const COLUMNS: &str = "\
    id, user_id, name, slug, description, is_public, is_demo, \
    theme_id, community_id, template_id, created_at, updated_at";

/// Provides data access for portfolios.
pub struct PortfolioRepo;

impl PortfolioRepo {
    /// Insert a new portfolio, returning the created row.
    ///
    /// The raw `sqlx::Error` is surfaced unclassified so the creation
    /// service can distinguish a slug collision (23505 on
    /// `uq_portfolios_slug`) from other failures and retry.
    pub async fn insert(pool: &PgPool, new: &NewPortfolio) -> Result<Portfolio, sqlx::Error> {
        let query = format!(
            "INSERT INTO portfolios \
                (user_id, name, slug, description, is_public, is_demo, \
                 theme_id, community_id, template_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(new.user_id)
            .bind(&new.name)
            .bind(&new.slug)
            .bind(&new.description)
            .bind(new.is_public)
            .bind(new.is_demo)
            .bind(new.theme_id)
            .bind(new.community_id)
            .bind(new.template_id)
            .fetch_one(pool)
            .await
    }

    /// Find a portfolio by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Portfolio>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM portfolios WHERE id = $1");
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the portfolio a user already has in a community, if any.
    ///
    /// Backing invariant: the partial unique index on
    /// `(user_id, community_id)`.
    pub async fn find_by_user_and_community(
        pool: &PgPool,
        user_id: DbId,
        community_id: DbId,
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM portfolios WHERE user_id = $1 AND community_id = $2");
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(user_id)
            .bind(community_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's portfolios, most recently updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Portfolio>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portfolios \
             WHERE user_id = $1 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Partially update a portfolio. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row matched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePortfolio,
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        let query = format!(
            "UPDATE portfolios SET \
                 name         = COALESCE($2, name), \
                 description  = COALESCE($3, description), \
                 theme_id     = COALESCE($4, theme_id), \
                 is_public    = COALESCE($5, is_public), \
                 community_id = COALESCE($6, community_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.theme_id)
            .bind(input.is_public)
            .bind(input.community_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a portfolio owned by `user_id`.
    ///
    /// Pages, layouts, and widget instances cascade. Returns `true` if a
    /// row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM portfolios WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
