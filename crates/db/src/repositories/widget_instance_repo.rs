//! Repository for the `widget_instances` table.
//!
//! The layout save is a full replace: delete everything for the page,
//! then bulk-insert the fresh rows. The identity widget additionally
//! supports a targeted upsert on `(page_id, key)`.

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::widget_instance::{NewWidgetInstance, WidgetInstance, WidgetInstanceWithType};

const COLUMNS: &str =
    "id, page_id, key, widget_type_id, props, enabled, created_at, updated_at";

/// Provides data access for widget instances.
pub struct WidgetInstanceRepo;

impl WidgetInstanceRepo {
    /// Delete every widget instance on a page. Returns the row count.
    pub async fn delete_for_page(pool: &PgPool, page_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM widget_instances WHERE page_id = $1")
            .bind(page_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Bulk-insert instances for a page via UNNEST.
    pub async fn insert_many(
        pool: &PgPool,
        page_id: DbId,
        rows: &[NewWidgetInstance],
    ) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        let type_ids: Vec<DbId> = rows.iter().map(|r| r.widget_type_id).collect();
        let props: Vec<serde_json::Value> = rows.iter().map(|r| r.props.clone()).collect();

        let result = sqlx::query(
            "INSERT INTO widget_instances (page_id, key, widget_type_id, props) \
             SELECT $1, k, t, p \
             FROM UNNEST($2::text[], $3::bigint[], $4::jsonb[]) AS u(k, t, p)",
        )
        .bind(page_id)
        .bind(&keys)
        .bind(&type_ids)
        .bind(&props)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// How many instances exist on a page.
    pub async fn count_for_page(pool: &PgPool, page_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM widget_instances WHERE page_id = $1")
                .bind(page_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// List a page's instances joined with their type keys.
    pub async fn list_for_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Vec<WidgetInstanceWithType>, sqlx::Error> {
        sqlx::query_as::<_, WidgetInstanceWithType>(
            "SELECT wi.id, wi.page_id, wi.key, wi.widget_type_id, \
                    wt.key AS type_key, wi.props, wi.enabled \
             FROM widget_instances wi \
             JOIN widget_types wt ON wt.id = wi.widget_type_id \
             WHERE wi.page_id = $1 \
             ORDER BY wi.id",
        )
        .bind(page_id)
        .fetch_all(pool)
        .await
    }

    /// Fetch one instance by its layout key.
    pub async fn find_by_key(
        pool: &PgPool,
        page_id: DbId,
        key: &str,
    ) -> Result<Option<WidgetInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM widget_instances WHERE page_id = $1 AND key = $2");
        sqlx::query_as::<_, WidgetInstance>(&query)
            .bind(page_id)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update one instance on the `(page_id, key)` constraint.
    ///
    /// Used by the identity props save, which must not disturb the rest
    /// of the page.
    pub async fn upsert(
        pool: &PgPool,
        page_id: DbId,
        key: &str,
        widget_type_id: DbId,
        props: &serde_json::Value,
    ) -> Result<WidgetInstance, sqlx::Error> {
        let query = format!(
            "INSERT INTO widget_instances (page_id, key, widget_type_id, props, enabled) \
             VALUES ($1, $2, $3, $4, true) \
             ON CONFLICT (page_id, key) DO UPDATE SET \
                 props   = EXCLUDED.props, \
                 enabled = true \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WidgetInstance>(&query)
            .bind(page_id)
            .bind(key)
            .bind(widget_type_id)
            .bind(props)
            .fetch_one(pool)
            .await
    }
}
