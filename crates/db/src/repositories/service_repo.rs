//! Repository for the `services` table.
//!
//! Field edits are single-statement updates. Array element edits use
//! `jsonb_set` so concurrent edits to different indices of the same array
//! never overwrite each other.

use logicton_core::content::ServiceDocument;
use logicton_core::locale::Locale;
use logicton_core::service::{ArrayEdit, ServicePatch};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::service::Service;

/// Column list for `services` queries.
const COLUMNS: &str = "\
    id, title_th, title_en, description_th, description_en, \
    features_th, features_en, how_we_work_th, how_we_work_en, \
    technologies, icon, category, sort_order, is_active, created_at, updated_at";

/// Provides data access for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Active services in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services WHERE is_active = TRUE \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }

    /// Find a service by id, active or not.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new service. A duplicate id violates `services_pkey`.
    pub async fn create(pool: &PgPool, doc: &ServiceDocument) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services \
                 (id, title_th, title_en, description_th, description_en, \
                  features_th, features_en, how_we_work_th, how_we_work_en, \
                  technologies, icon, category, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        bind_document(sqlx::query_as::<_, Service>(&query), doc)
            .fetch_one(pool)
            .await
    }

    /// Insert or fully replace a service by id.
    pub async fn upsert(pool: &PgPool, doc: &ServiceDocument) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services \
                 (id, title_th, title_en, description_th, description_en, \
                  features_th, features_en, how_we_work_th, how_we_work_en, \
                  technologies, icon, category, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (id) DO UPDATE SET \
                 title_th = EXCLUDED.title_th, \
                 title_en = EXCLUDED.title_en, \
                 description_th = EXCLUDED.description_th, \
                 description_en = EXCLUDED.description_en, \
                 features_th = EXCLUDED.features_th, \
                 features_en = EXCLUDED.features_en, \
                 how_we_work_th = EXCLUDED.how_we_work_th, \
                 how_we_work_en = EXCLUDED.how_we_work_en, \
                 technologies = EXCLUDED.technologies, \
                 icon = EXCLUDED.icon, \
                 category = EXCLUDED.category, \
                 sort_order = EXCLUDED.sort_order, \
                 is_active = EXCLUDED.is_active \
             RETURNING {COLUMNS}"
        );
        bind_document(sqlx::query_as::<_, Service>(&query), doc)
            .fetch_one(pool)
            .await
    }

    /// Delete a service. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply one validated field edit. Returns `false` if the service does
    /// not exist.
    pub async fn apply_patch(
        pool: &PgPool,
        id: &str,
        patch: &ServicePatch,
    ) -> Result<bool, sqlx::Error> {
        match patch {
            ServicePatch::Title { locale, value } => {
                let column = match locale {
                    Locale::Th => "title_th",
                    Locale::En => "title_en",
                };
                set_column(pool, id, column, value.as_str()).await
            }
            ServicePatch::Description { locale, value } => {
                let column = match locale {
                    Locale::Th => "description_th",
                    Locale::En => "description_en",
                };
                set_column(pool, id, column, value.as_str()).await
            }
            ServicePatch::Features { locale, edit } => {
                let column = match locale {
                    Locale::Th => "features_th",
                    Locale::En => "features_en",
                };
                apply_array_edit(pool, id, column, edit).await
            }
            ServicePatch::HowWeWork { locale, edit } => {
                let column = match locale {
                    Locale::Th => "how_we_work_th",
                    Locale::En => "how_we_work_en",
                };
                apply_array_edit(pool, id, column, edit).await
            }
            ServicePatch::Technologies(values) => {
                set_column(pool, id, "technologies", Json(values)).await
            }
            ServicePatch::Icon(icon) => set_column(pool, id, "icon", icon.as_str()).await,
            ServicePatch::Category(category) => {
                set_column(pool, id, "category", category.as_str()).await
            }
            ServicePatch::Order(order) => set_column(pool, id, "sort_order", *order).await,
            ServicePatch::IsActive(active) => set_column(pool, id, "is_active", *active).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type ServiceQuery<'q> =
    sqlx::query::QueryAs<'q, sqlx::Postgres, Service, sqlx::postgres::PgArguments>;

fn bind_document<'q>(query: ServiceQuery<'q>, doc: &'q ServiceDocument) -> ServiceQuery<'q> {
    let (how_th, how_en) = match &doc.how_we_work {
        Some(steps) => (Some(Json(&steps.th)), Some(Json(&steps.en))),
        None => (None, None),
    };
    query
        .bind(&doc.id)
        .bind(&doc.title.th)
        .bind(&doc.title.en)
        .bind(&doc.description.th)
        .bind(&doc.description.en)
        .bind(Json(&doc.features.th))
        .bind(Json(&doc.features.en))
        .bind(how_th)
        .bind(how_en)
        .bind(Json(&doc.technologies))
        .bind(&doc.icon)
        .bind(doc.category.as_str())
        .bind(doc.order)
        .bind(doc.is_active)
}

/// `column` is always one of the literals chosen in [`ServiceRepo::apply_patch`].
async fn set_column<T>(
    pool: &PgPool,
    id: &str,
    column: &'static str,
    value: T,
) -> Result<bool, sqlx::Error>
where
    T: Send + for<'a> sqlx::Encode<'a, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    let query = format!("UPDATE services SET {column} = $2 WHERE id = $1");
    let result = sqlx::query(&query)
        .bind(id)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn apply_array_edit<T: Serialize + Sync>(
    pool: &PgPool,
    id: &str,
    column: &'static str,
    edit: &ArrayEdit<T>,
) -> Result<bool, sqlx::Error> {
    match edit {
        ArrayEdit::Replace(values) => set_column(pool, id, column, Json(values)).await,
        ArrayEdit::Element { index, value } => {
            // An index at or past the end appends.
            let query = format!(
                "UPDATE services SET {column} = \
                     jsonb_set(COALESCE({column}, '[]'::jsonb), ARRAY[$2::text], $3, true) \
                 WHERE id = $1"
            );
            let result = sqlx::query(&query)
                .bind(id)
                .bind(index.to_string())
                .bind(Json(value))
                .execute(pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }
    }
}
