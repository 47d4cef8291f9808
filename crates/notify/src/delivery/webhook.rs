//! Chat webhook delivery.
//!
//! [`WebhookDelivery`] posts `{"text": ...}` to an incoming-webhook URL
//! (Slack-compatible). A single attempt is made per message.

use std::time::Duration;

/// HTTP request timeout for a delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

pub struct WebhookDelivery {
    client: reqwest::Client,
    url: String,
}

impl WebhookDelivery {
    pub fn new(url: impl Into<String>) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Post `text` to the webhook and check the response status.
    pub async fn deliver(&self, text: &str) -> Result<(), WebhookError> {
        let payload = serde_json::json!({ "text": text });
        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        tracing::info!("Chat notification sent");
        Ok(())
    }
}
