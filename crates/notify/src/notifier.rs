//! Concurrent fan-out of a contact notification to every configured channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use logicton_core::contact::ValidContact;

use crate::delivery::{EmailDelivery, EmailError, WebhookDelivery, WebhookError};
use crate::templates;

/// Per-channel deadline when none is configured.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("Notification timed out after {0:?}")]
    TimedOut(Duration),
}

/// A rendered contact notification.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl ContactMessage {
    pub fn render(contact: &ValidContact) -> Self {
        Self {
            subject: templates::subject(contact),
            text: templates::text(contact),
            html: templates::html(contact),
        }
    }
}

/// One destination for contact notifications.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Short name used in logs (`email`, `chat`).
    fn name(&self) -> &'static str;

    async fn send(&self, message: &ContactMessage) -> Result<(), NotifyError>;
}

#[async_trait]
impl NotificationChannel for EmailDelivery {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, message: &ContactMessage) -> Result<(), NotifyError> {
        self.deliver(&message.subject, &message.text, &message.html)
            .await
            .map_err(NotifyError::from)
    }
}

#[async_trait]
impl NotificationChannel for WebhookDelivery {
    fn name(&self) -> &'static str {
        "chat"
    }

    async fn send(&self, message: &ContactMessage) -> Result<(), NotifyError> {
        self.deliver(&message.text).await.map_err(NotifyError::from)
    }
}

/// Outcome counts of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Sends each contact submission to every channel at once.
///
/// Every channel gets the same deadline. Failures and timeouts are logged
/// and counted, never returned.
#[derive(Clone)]
pub struct ContactNotifier {
    channels: Vec<Arc<dyn NotificationChannel>>,
    timeout: Duration,
}

impl Default for ContactNotifier {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ContactNotifier {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self {
            channels,
            timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    pub async fn notify(&self, contact: &ValidContact) -> NotifyReport {
        if self.channels.is_empty() {
            tracing::debug!("No notification channels configured");
            return NotifyReport::default();
        }

        let message = ContactMessage::render(contact);
        let results = join_all(self.channels.iter().map(|channel| {
            let message = &message;
            let timeout = self.timeout;
            async move {
                let result = match tokio::time::timeout(timeout, channel.send(message)).await {
                    Ok(result) => result,
                    Err(_) => Err(NotifyError::TimedOut(timeout)),
                };
                (channel.name(), result)
            }
        }))
        .await;

        let mut report = NotifyReport::default();
        for (channel, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::error!(channel, error = %e, "Failed to send contact notification");
                    report.failed += 1;
                }
            }
        }
        report
    }
}
