//! The edit session: edit-mode toggle plus the pending batch.

use std::sync::Arc;

use crate::mode::{ModeStore, ModeStoreError};
use crate::pending::{Destination, PendingChange, PendingChanges};
use crate::sink::{ChangeSink, SinkError};

/// Result of one [`EditSession::save_changes`] call.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    /// Entries persisted and removed from the pending set.
    pub saved: usize,
    /// Destinations that failed; their entries stay pending.
    pub failures: Vec<(Destination, SinkError)>,
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Inline-editing state for one signed-in user.
pub struct EditSession {
    is_admin: bool,
    edit_mode: bool,
    pending: PendingChanges,
    mode_store: Arc<dyn ModeStore>,
    sink: Arc<dyn ChangeSink>,
}

impl EditSession {
    /// Start a session, restoring the stored edit-mode flag.
    ///
    /// A stored `true` only takes effect for admins.
    pub async fn open(
        is_admin: bool,
        mode_store: Arc<dyn ModeStore>,
        sink: Arc<dyn ChangeSink>,
    ) -> Result<Self, ModeStoreError> {
        let stored = mode_store.load().await?;
        Ok(Self {
            is_admin,
            edit_mode: is_admin && stored,
            pending: PendingChanges::new(),
            mode_store,
            sink,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn add_change(&mut self, change: PendingChange) {
        self.pending.insert(change);
    }

    pub fn remove_change(&mut self, path: &str) -> Option<PendingChange> {
        self.pending.remove(path)
    }

    /// Turn edit mode on or off. Ignored for non-admins (returns `false`).
    /// Turning it off discards pending changes.
    pub async fn set_edit_mode(&mut self, enabled: bool) -> Result<bool, ModeStoreError> {
        if !self.is_admin {
            tracing::debug!("Ignoring edit-mode change for non-admin session");
            return Ok(false);
        }
        self.edit_mode = enabled;
        if !enabled {
            self.pending.clear();
        }
        self.mode_store.store(enabled).await?;
        Ok(true)
    }

    /// Discard every pending change and leave edit mode.
    pub async fn cancel_changes(&mut self) -> Result<(), ModeStoreError> {
        self.pending.clear();
        self.edit_mode = false;
        self.mode_store.store(false).await
    }

    /// Flush pending changes, one request per destination.
    ///
    /// Only the destinations that were saved are cleared. Edit mode is left
    /// as it is.
    pub async fn save_changes(&mut self) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        let inline = self.pending.inline_batch();
        if !inline.is_empty() {
            match self.sink.save_inline(&inline).await {
                Ok(()) => {
                    self.pending.clear_destination(Destination::Content);
                    outcome.saved += inline.len();
                }
                Err(e) => {
                    tracing::warn!(error = %e, count = inline.len(), "Failed to save content changes");
                    outcome.failures.push((Destination::Content, e));
                }
            }
        }

        let services = self.pending.service_batch();
        if !services.is_empty() {
            match self.sink.save_services(&services).await {
                Ok(()) => {
                    self.pending.clear_destination(Destination::Services);
                    outcome.saved += services.len();
                }
                Err(e) => {
                    tracing::warn!(error = %e, count = services.len(), "Failed to save service changes");
                    outcome.failures.push((Destination::Services, e));
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use logicton_core::locale::Locale;
    use logicton_core::service::ServiceChange;
    use serde_json::json;

    use super::*;
    use crate::mode::MemoryModeStore;
    use crate::pending::InlineEdit;

    #[derive(Default)]
    struct RecordingSink {
        inline: Mutex<Vec<Vec<InlineEdit>>>,
        services: Mutex<Vec<Vec<ServiceChange>>>,
        fail_services: bool,
    }

    #[async_trait]
    impl ChangeSink for RecordingSink {
        async fn save_inline(&self, changes: &[InlineEdit]) -> Result<(), SinkError> {
            self.inline.lock().unwrap().push(changes.to_vec());
            Ok(())
        }

        async fn save_services(&self, changes: &[ServiceChange]) -> Result<(), SinkError> {
            if self.fail_services {
                return Err(SinkError::Rejected("boom".into()));
            }
            self.services.lock().unwrap().push(changes.to_vec());
            Ok(())
        }
    }

    async fn session(
        is_admin: bool,
        store: Arc<MemoryModeStore>,
        sink: Arc<RecordingSink>,
    ) -> EditSession {
        EditSession::open(is_admin, store, sink).await.unwrap()
    }

    fn service_change() -> PendingChange {
        PendingChange::service(
            "services.web-development.title",
            "web-development",
            "title",
            json!("Websites"),
            Locale::En,
            None,
        )
    }

    #[tokio::test]
    async fn stored_mode_is_restored_for_admins_only() {
        let store = Arc::new(MemoryModeStore::new(true));
        let sink = Arc::new(RecordingSink::default());

        assert!(session(true, store.clone(), sink.clone()).await.is_edit_mode());
        assert!(!session(false, store, sink).await.is_edit_mode());
    }

    #[tokio::test]
    async fn non_admin_cannot_enable_edit_mode() {
        let store = Arc::new(MemoryModeStore::default());
        let mut s = session(false, store.clone(), Arc::new(RecordingSink::default())).await;

        assert!(!s.set_edit_mode(true).await.unwrap());
        assert!(!s.is_edit_mode());
        assert!(!store.load().await.unwrap());
    }

    #[tokio::test]
    async fn leaving_edit_mode_discards_changes_and_persists() {
        let store = Arc::new(MemoryModeStore::default());
        let mut s = session(true, store.clone(), Arc::new(RecordingSink::default())).await;

        s.set_edit_mode(true).await.unwrap();
        assert!(store.load().await.unwrap());
        s.add_change(PendingChange::text("home.hero.title", "Hi", Locale::En));
        assert!(s.has_changes());

        s.set_edit_mode(false).await.unwrap();
        assert!(!s.has_changes());
        assert!(!store.load().await.unwrap());
    }

    #[tokio::test]
    async fn cancel_clears_and_exits() {
        let store = Arc::new(MemoryModeStore::new(true));
        let mut s = session(true, store.clone(), Arc::new(RecordingSink::default())).await;
        s.add_change(PendingChange::text("home.hero.title", "Hi", Locale::En));

        s.cancel_changes().await.unwrap();

        assert!(!s.has_changes());
        assert!(!s.is_edit_mode());
        assert!(!store.load().await.unwrap());
    }

    #[tokio::test]
    async fn save_splits_batches_and_keeps_edit_mode() {
        let sink = Arc::new(RecordingSink::default());
        let mut s = session(true, Arc::new(MemoryModeStore::new(true)), sink.clone()).await;
        s.add_change(PendingChange::text("home.hero.title", "Hi", Locale::En));
        s.add_change(service_change());
        s.add_change(PendingChange::text("about.description", "Us", Locale::Th));

        let outcome = s.save_changes().await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.saved, 3);
        assert!(!s.has_changes());
        assert!(s.is_edit_mode());

        let inline = sink.inline.lock().unwrap();
        assert_eq!(inline.len(), 1);
        let paths: Vec<_> = inline[0].iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, ["home.hero.title", "about.description"]);

        let services = sink.services.lock().unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0][0].service_id, "web-development");
    }

    #[tokio::test]
    async fn failed_destination_stays_pending() {
        let sink = Arc::new(RecordingSink {
            fail_services: true,
            ..Default::default()
        });
        let mut s = session(true, Arc::new(MemoryModeStore::new(true)), sink).await;
        s.add_change(PendingChange::text("home.hero.title", "Hi", Locale::En));
        s.add_change(service_change());

        let outcome = s.save_changes().await;

        assert!(!outcome.is_complete());
        assert_eq!(outcome.saved, 1);
        assert_matches!(outcome.failures.as_slice(), [(Destination::Services, SinkError::Rejected(_))]);
        assert_eq!(s.pending().len(), 1);
        assert!(s.pending().get("services.web-development.title").is_some());
    }

    #[tokio::test]
    async fn empty_save_sends_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let mut s = session(true, Arc::new(MemoryModeStore::default()), sink.clone()).await;

        let outcome = s.save_changes().await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.saved, 0);
        assert!(sink.inline.lock().unwrap().is_empty());
        assert!(sink.services.lock().unwrap().is_empty());
    }
}
