//! Repository for the `inline_editable_content` table.
//!
//! Rows are keyed by `(page, section, field, locale)`; writes are upserts so
//! the same key never produces a second row. Last writer wins.

use logicton_core::content_path::ContentPath;
use logicton_core::locale::Locale;
use sqlx::PgPool;

use crate::models::inline_content::InlineContent;

/// Column list for `inline_editable_content` queries.
const COLUMNS: &str = "\
    id, page, section, field, locale, value, is_active, created_at, updated_at";

/// Provides data access for inline content overrides.
pub struct InlineContentRepo;

impl InlineContentRepo {
    /// Insert or replace the override for `path` in `locale`.
    ///
    /// A save always makes the override visible again, so a row that was
    /// switched off in the table is reactivated.
    pub async fn upsert(
        pool: &PgPool,
        path: &ContentPath,
        locale: Locale,
        value: &str,
    ) -> Result<InlineContent, sqlx::Error> {
        let query = format!(
            "INSERT INTO inline_editable_content (page, section, field, locale, value) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_inline_content_key DO UPDATE SET \
                 value = EXCLUDED.value, is_active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InlineContent>(&query)
            .bind(&path.page)
            .bind(&path.section)
            .bind(&path.field)
            .bind(locale.as_str())
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// All active overrides for a page in one locale.
    pub async fn list_active_for_page(
        pool: &PgPool,
        page: &str,
        locale: Locale,
    ) -> Result<Vec<InlineContent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inline_editable_content \
             WHERE page = $1 AND locale = $2 AND is_active = TRUE \
             ORDER BY section, field"
        );
        sqlx::query_as::<_, InlineContent>(&query)
            .bind(page)
            .bind(locale.as_str())
            .fetch_all(pool)
            .await
    }

    /// Every stored value for `path`, across locales and activity.
    pub async fn values_for_path(
        pool: &PgPool,
        path: &ContentPath,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT value FROM inline_editable_content \
             WHERE page = $1 AND section = $2 AND field = $3 \
             ORDER BY locale",
        )
        .bind(&path.page)
        .bind(&path.section)
        .bind(&path.field)
        .fetch_all(pool)
        .await
    }
}
