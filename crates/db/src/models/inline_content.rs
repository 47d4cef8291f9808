//! Inline content overrides (`inline_editable_content`).

use logicton_core::content_path::ContentPath;
use logicton_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `inline_editable_content` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InlineContent {
    pub id: DbId,
    pub page: String,
    pub section: String,
    pub field: String,
    pub locale: String,
    pub value: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InlineContent {
    /// The dotted content path this row overrides.
    pub fn path(&self) -> String {
        ContentPath::join(&self.page, &self.section, &self.field)
    }
}
