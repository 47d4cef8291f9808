//! Pending changes, keyed by content path in insertion order.

use indexmap::IndexMap;
use logicton_core::locale::Locale;
use logicton_core::service::ServiceChange;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unsaved edit.
///
/// Entries with a `service_id` target a service field; the rest are generic
/// content overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChange {
    /// Content path, also the key in [`PendingChanges`].
    pub path: String,
    pub value: Value,
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

impl PendingChange {
    /// A generic content override.
    pub fn text(path: impl Into<String>, value: impl Into<String>, locale: Locale) -> Self {
        Self {
            path: path.into(),
            value: Value::String(value.into()),
            locale,
            service_id: None,
            field: None,
            index: None,
        }
    }

    /// An edit to one field of a service, optionally at an array index.
    pub fn service(
        path: impl Into<String>,
        service_id: impl Into<String>,
        field: impl Into<String>,
        value: Value,
        locale: Locale,
        index: Option<i64>,
    ) -> Self {
        Self {
            path: path.into(),
            value,
            locale,
            service_id: Some(service_id.into()),
            field: Some(field.into()),
            index,
        }
    }

    pub fn is_service_change(&self) -> bool {
        self.service_id.is_some()
    }

    pub fn destination(&self) -> Destination {
        if self.is_service_change() {
            Destination::Services
        } else {
            Destination::Content
        }
    }
}

/// Which endpoint a pending change is flushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// `/api/content/inline-edit`
    Content,
    /// `/api/content/services/inline-edit`
    Services,
}

/// Body entry for the generic content endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineEdit {
    pub path: String,
    pub value: String,
    pub locale: Locale,
}

impl From<&PendingChange> for InlineEdit {
    fn from(change: &PendingChange) -> Self {
        let value = match &change.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            path: change.path.clone(),
            value,
            locale: change.locale,
        }
    }
}

fn to_service_change(change: &PendingChange, service_id: &str) -> ServiceChange {
    ServiceChange {
        service_id: service_id.to_string(),
        field: change.field.clone().unwrap_or_default(),
        locale: change.locale.as_str().to_string(),
        value: change.value.clone(),
        index: change.index,
    }
}

/// Insertion-ordered pending changes. Adding a path that is already pending
/// replaces its value but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct PendingChanges {
    entries: IndexMap<String, PendingChange>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, change: PendingChange) {
        self.entries.insert(change.path.clone(), change);
    }

    pub fn remove(&mut self, path: &str) -> Option<PendingChange> {
        self.entries.shift_remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&PendingChange> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingChange> {
        self.entries.values()
    }

    /// Content overrides, in insertion order.
    pub fn inline_batch(&self) -> Vec<InlineEdit> {
        self.iter()
            .filter(|c| !c.is_service_change())
            .map(InlineEdit::from)
            .collect()
    }

    /// Service field edits, in insertion order.
    pub fn service_batch(&self) -> Vec<ServiceChange> {
        self.iter()
            .filter_map(|c| c.service_id.as_deref().map(|id| to_service_change(c, id)))
            .collect()
    }

    /// Drop every entry bound for `destination`.
    pub fn clear_destination(&mut self, destination: Destination) {
        self.entries
            .retain(|_, change| change.destination() != destination);
    }
}
