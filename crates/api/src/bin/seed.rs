//! Import the legacy `services.json` and `team.json` files into Postgres.
//!
//! Safe to run repeatedly: every record is upserted by id.
//!
//! ```text
//! DATABASE_URL=postgres://... CONTENT_DIR=./content logicton-seed
//! ```

use std::path::PathBuf;

use anyhow::Context;
use logicton_core::content::{SERVICES_FILE, TEAM_FILE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logicton_db=info,logicton_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let content_dir = PathBuf::from(
        std::env::var("CONTENT_DIR").unwrap_or_else(|_| "./content".into()),
    );

    let pool = logicton_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    logicton_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let services = logicton_db::seed::import_services(&pool, &content_dir.join(SERVICES_FILE))
        .await
        .context("Service import failed")?;
    let members = logicton_db::seed::import_team(&pool, &content_dir.join(TEAM_FILE))
        .await
        .context("Team import failed")?;

    tracing::info!(services, members, "Seed import complete");
    Ok(())
}
