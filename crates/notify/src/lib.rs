//! Contact form notifications: SMTP email and chat webhook delivery, the
//! message templates they share, and the concurrent fan-out over both.

pub mod delivery;
pub mod notifier;
pub mod templates;

pub use notifier::{
    ContactMessage, ContactNotifier, NotificationChannel, NotifyError, NotifyReport,
    DEFAULT_NOTIFY_TIMEOUT,
};
