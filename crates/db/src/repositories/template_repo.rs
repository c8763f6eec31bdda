//! Repository for the `portfolio_templates` table.

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::template::PortfolioTemplate;

const COLUMNS: &str = "\
    id, community_id, name, description, layout, widget_configs, \
    preview_image_url, is_active, is_mandatory, created_at, updated_at";

/// Provides data access for portfolio templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Find an active template by id.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PortfolioTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM portfolio_templates WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, PortfolioTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The mandatory template for a community, if one is configured.
    pub async fn find_mandatory_for_community(
        pool: &PgPool,
        community_id: DbId,
    ) -> Result<Option<PortfolioTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portfolio_templates \
             WHERE community_id = $1 AND is_mandatory = true AND is_active = true \
             ORDER BY created_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, PortfolioTemplate>(&query)
            .bind(community_id)
            .fetch_optional(pool)
            .await
    }

    /// List templates available to a user: system templates
    /// (`community_id IS NULL`) plus, when a community is given, that
    /// community's own templates.
    pub async fn list_available(
        pool: &PgPool,
        community_id: Option<DbId>,
    ) -> Result<Vec<PortfolioTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portfolio_templates \
             WHERE is_active = true \
               AND (community_id IS NULL OR community_id = $1) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PortfolioTemplate>(&query)
            .bind(community_id)
            .fetch_all(pool)
            .await
    }
}
