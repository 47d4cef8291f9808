//! PostgreSQL access for the Logicton site: pool setup, embedded migrations,
//! row models, repositories, the shared rate limiter and JSON seed import.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod rate_limit;
pub mod repositories;
pub mod seed;

pub use rate_limit::PgRateLimiter;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
