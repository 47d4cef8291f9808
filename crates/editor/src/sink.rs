//! Where pending changes are flushed to.

use std::time::Duration;

use async_trait::async_trait;
use logicton_core::service::ServiceChange;
use serde::{Deserialize, Serialize};

use crate::pending::InlineEdit;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const INLINE_ENDPOINT: &str = "/api/content/inline-edit";
const SERVICES_ENDPOINT: &str = "/api/content/services/inline-edit";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The server answered 2xx but reported `success: false`.
    #[error("Server rejected the changes: {0}")]
    Rejected(String),
}

/// Persists one destination's batch.
#[async_trait]
pub trait ChangeSink: Send + Sync {
    async fn save_inline(&self, changes: &[InlineEdit]) -> Result<(), SinkError>;

    async fn save_services(&self, changes: &[ServiceChange]) -> Result<(), SinkError>;
}

#[derive(Serialize)]
struct ChangesBody<'a, T> {
    changes: &'a [T],
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts batches to the site API with a bearer token.
pub struct HttpChangeSink {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpChangeSink {
    /// `base_url` is the site origin, e.g. `https://logicton.example`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn post<T: Serialize + Sync>(&self, endpoint: &str, changes: &[T]) -> Result<(), SinkError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(&self.token)
            .json(&ChangesBody { changes })
            .send()
            .await?;

        let status = response.status();
        let envelope: Option<Envelope> = response.json().await.ok();

        if !status.is_success() {
            return Err(SinkError::HttpStatus {
                status: status.as_u16(),
                message: envelope
                    .and_then(|e| e.error)
                    .unwrap_or_else(|| status.to_string()),
            });
        }
        match envelope {
            Some(e) if e.success => {
                tracing::debug!(endpoint, count = changes.len(), "Changes saved");
                Ok(())
            }
            Some(e) => Err(SinkError::Rejected(
                e.error.unwrap_or_else(|| "unknown error".into()),
            )),
            None => Err(SinkError::Rejected("response was not JSON".into())),
        }
    }
}

#[async_trait]
impl ChangeSink for HttpChangeSink {
    async fn save_inline(&self, changes: &[InlineEdit]) -> Result<(), SinkError> {
        self.post(INLINE_ENDPOINT, changes).await
    }

    async fn save_services(&self, changes: &[ServiceChange]) -> Result<(), SinkError> {
        self.post(SERVICES_ENDPOINT, changes).await
    }
}

#[cfg(test)]
mod tests {
    use logicton_core::locale::Locale;

    use super::*;

    #[test]
    fn endpoint_urls_ignore_trailing_slash() {
        let sink = HttpChangeSink::new("http://localhost:3000/", "t").unwrap();
        assert_eq!(
            sink.url(SERVICES_ENDPOINT),
            "http://localhost:3000/api/content/services/inline-edit"
        );
    }

    #[test]
    fn body_wraps_changes() {
        let changes = [InlineEdit {
            path: "home.hero.title".into(),
            value: "Hi".into(),
            locale: Locale::Th,
        }];
        let body = serde_json::to_value(ChangesBody { changes: &changes }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"changes": [{"path": "home.hero.title", "value": "Hi", "locale": "th"}]})
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_request_error() {
        let sink = HttpChangeSink::new("http://127.0.0.1:9", "t").unwrap();
        let err = sink.save_inline(&[]).await.unwrap_err();
        assert!(matches!(err, SinkError::Request(_)));
    }
}
