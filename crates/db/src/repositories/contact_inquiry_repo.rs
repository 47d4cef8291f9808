//! Repository for the `contact_inquiries` table.

use logicton_core::contact::InquiryStatus;
use sqlx::PgPool;

use crate::models::contact_inquiry::{ContactInquiry, InquiryStats, NewInquiry};

/// Column list for `contact_inquiries` queries.
const COLUMNS: &str = "\
    id, name, email, phone, company, subject, message, language, status, \
    ip_address, submitted_at, updated_at";

/// Provides data access for contact inquiries.
pub struct ContactInquiryRepo;

impl ContactInquiryRepo {
    /// Record a new inquiry with status `new`.
    pub async fn create(pool: &PgPool, input: &NewInquiry) -> Result<ContactInquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_inquiries \
                 (id, name, email, phone, company, subject, message, language, ip_address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.language)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<ContactInquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_inquiries \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY submitted_at DESC, id"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(status.map(InquiryStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Inbox counters.
    pub async fn stats(pool: &PgPool) -> Result<InquiryStats, sqlx::Error> {
        sqlx::query_as::<_, InquiryStats>(
            "SELECT \
                 COUNT(*) AS total, \
                 COUNT(*) FILTER (WHERE status = 'new') AS new, \
                 COUNT(*) FILTER (WHERE status = 'read') AS read, \
                 COUNT(*) FILTER (WHERE status = 'replied') AS replied, \
                 COUNT(*) FILTER (WHERE status = 'archived') AS archived, \
                 COUNT(*) FILTER (WHERE submitted_at > NOW() - INTERVAL '7 days') AS this_week \
             FROM contact_inquiries",
        )
        .fetch_one(pool)
        .await
    }

    /// Move an inquiry to `status`. Returns `None` if it does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: &str,
        status: InquiryStatus,
    ) -> Result<Option<ContactInquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_inquiries SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete an inquiry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_inquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
