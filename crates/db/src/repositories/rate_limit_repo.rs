//! Repository for the `rate_limit_windows` table.

use logicton_core::types::Timestamp;
use sqlx::PgPool;

/// Counter state after a hit.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct WindowState {
    pub hits: i32,
    pub reset_at: Timestamp,
}

/// Provides data access for fixed-window counters.
pub struct RateLimitRepo;

impl RateLimitRepo {
    /// Count one hit for `key` in a single statement.
    ///
    /// An expired window restarts at 1. A live window counts up to
    /// `max_hits + 1` and stays there, so `hits > max_hits` means the
    /// attempt is over the limit.
    pub async fn hit(
        pool: &PgPool,
        key: &str,
        window_secs: i64,
        max_hits: i32,
    ) -> Result<WindowState, sqlx::Error> {
        sqlx::query_as::<_, WindowState>(
            "INSERT INTO rate_limit_windows (key, hits, reset_at) \
             VALUES ($1, 1, NOW() + make_interval(secs => $2)) \
             ON CONFLICT (key) DO UPDATE SET \
                 hits = CASE \
                     WHEN rate_limit_windows.reset_at < NOW() THEN 1 \
                     ELSE LEAST(rate_limit_windows.hits + 1, $3 + 1) END, \
                 reset_at = CASE \
                     WHEN rate_limit_windows.reset_at < NOW() \
                         THEN NOW() + make_interval(secs => $2) \
                     ELSE rate_limit_windows.reset_at END \
             RETURNING hits, reset_at",
        )
        .bind(key)
        .bind(window_secs as f64)
        .bind(max_hits)
        .fetch_one(pool)
        .await
    }

    /// Delete expired windows. Returns the number removed.
    pub async fn sweep_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rate_limit_windows WHERE reset_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
