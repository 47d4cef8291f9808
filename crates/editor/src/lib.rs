//! Client-side state for inline editing.
//!
//! An [`EditSession`] collects [`PendingChange`]s while an admin edits a page,
//! remembers whether edit mode is on through a [`ModeStore`], and flushes the
//! batch to the API through a [`ChangeSink`].

pub mod mode;
pub mod pending;
pub mod session;
pub mod sink;

pub use mode::{FileModeStore, MemoryModeStore, ModeStore, ModeStoreError};
pub use pending::{Destination, InlineEdit, PendingChange, PendingChanges};
pub use session::{EditSession, SaveOutcome};
pub use sink::{ChangeSink, HttpChangeSink, SinkError};
