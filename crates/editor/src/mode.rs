//! Persistence of the edit-mode toggle.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ModeStoreError {
    #[error("Failed to access edit-mode file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Remembers whether edit mode was on across reloads.
#[async_trait]
pub trait ModeStore: Send + Sync {
    /// Stored flag; `false` when nothing has been stored yet.
    async fn load(&self) -> Result<bool, ModeStoreError>;

    async fn store(&self, enabled: bool) -> Result<(), ModeStoreError>;
}

/// Keeps the flag as the text `true` / `false` in a file.
///
/// Anything other than `true` in the file reads as off.
#[derive(Debug, Clone)]
pub struct FileModeStore {
    path: PathBuf,
}

impl FileModeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> ModeStoreError {
        ModeStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ModeStore for FileModeStore {
    async fn load(&self) -> Result<bool, ModeStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(raw.trim() == "true"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn store(&self, enabled: bool) -> Result<(), ModeStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let text = if enabled { "true" } else { "false" };
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| self.io_error(e))
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryModeStore {
    enabled: AtomicBool,
}

impl MemoryModeStore {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }
}

#[async_trait]
impl ModeStore for MemoryModeStore {
    async fn load(&self) -> Result<bool, ModeStoreError> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn store(&self, enabled: bool) -> Result<(), ModeStoreError> {
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }
}
