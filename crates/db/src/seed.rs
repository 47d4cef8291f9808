//! Import of the legacy `services.json` and `team.json` files.
//!
//! Imports are upserts keyed by id, so running them twice leaves one row
//! per document.

use std::path::Path;

use logicton_core::content::{ServicesFile, TeamFile};
use sqlx::PgPool;

use crate::repositories::{ServiceRepo, TeamMemberRepo};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SeedError> {
    let display = path.display().to_string();
    let bytes = tokio::fs::read(path).await.map_err(|source| SeedError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SeedError::Parse {
        path: display,
        source,
    })
}

/// Upsert every service in `path`. Returns the number imported.
pub async fn import_services(pool: &PgPool, path: &Path) -> Result<usize, SeedError> {
    let file: ServicesFile = read_json(path).await?;
    for doc in &file.services {
        ServiceRepo::upsert(pool, doc).await?;
        tracing::debug!(service_id = %doc.id, "Imported service");
    }
    tracing::info!(count = file.services.len(), path = %path.display(), "Services imported");
    Ok(file.services.len())
}

/// Upsert every team member in `path`. Returns the number imported.
pub async fn import_team(pool: &PgPool, path: &Path) -> Result<usize, SeedError> {
    let file: TeamFile = read_json(path).await?;
    for doc in &file.members {
        TeamMemberRepo::upsert(pool, doc).await?;
    }
    tracing::info!(count = file.members.len(), path = %path.display(), "Team imported");
    Ok(file.members.len())
}
