//! Repository for the `widget_types` lookup table.

use std::collections::HashMap;

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::widget_type::WidgetTypeRow;

const COLUMNS: &str = "id, key, display_name, created_at, updated_at";

/// Provides data access for the widget type catalog.
pub struct WidgetTypeRepo;

impl WidgetTypeRepo {
    /// List all widget types in catalog order.
    pub async fn list(pool: &PgPool) -> Result<Vec<WidgetTypeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM widget_types ORDER BY id");
        sqlx::query_as::<_, WidgetTypeRow>(&query).fetch_all(pool).await
    }

    /// Find a widget type by its registry key.
    pub async fn find_by_key(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<WidgetTypeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM widget_types WHERE key = $1");
        sqlx::query_as::<_, WidgetTypeRow>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the full key → id map in one query.
    ///
    /// Saves one lookup per widget during the bulk layout save.
    pub async fn key_to_id_map(pool: &PgPool) -> Result<HashMap<String, DbId>, sqlx::Error> {
        let rows: Vec<(String, DbId)> = sqlx::query_as("SELECT key, id FROM widget_types")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}
