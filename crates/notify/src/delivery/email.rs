//! Email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport. Configuration
//! is loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `Ok(None)` and no mailer should be
//! constructed.

use std::time::Duration;

use lettre::message::{header::ContentType, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("Email configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "noreply@logicton.local";

/// SMTP command timeout when `SMTP_TIMEOUT_SECS` is unset.
const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Inbox that receives contact form notifications.
    pub to_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// Applied to every SMTP command, connect included.
    pub timeout: Duration,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable           | Required            | Default                   |
    /// |--------------------|---------------------|---------------------------|
    /// | `SMTP_HOST`        | no (disables email) | -                         |
    /// | `SMTP_PORT`        | no                  | `587`                     |
    /// | `SMTP_FROM`        | no                  | `noreply@logicton.local`  |
    /// | `SMTP_USER`        | no                  | -                         |
    /// | `SMTP_PASSWORD`    | no                  | -                         |
    /// | `SMTP_TIMEOUT_SECS`| no                  | `10`                      |
    /// | `CONTACT_EMAIL_TO` | when `SMTP_HOST` set| -                         |
    pub fn from_env() -> Result<Option<Self>, EmailError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads from `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, EmailError> {
        let Some(smtp_host) = lookup("SMTP_HOST").filter(|h| !h.is_empty()) else {
            return Ok(None);
        };
        let to_address = lookup("CONTACT_EMAIL_TO")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                EmailError::Config("CONTACT_EMAIL_TO must be set when SMTP_HOST is set".into())
            })?;

        Ok(Some(Self {
            smtp_host,
            smtp_port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            to_address,
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
            timeout: lookup("SMTP_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SMTP_TIMEOUT),
        }))
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends notification emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn recipient(&self) -> &str {
        &self.config.to_address
    }

    /// Assemble a multipart/alternative message to the configured inbox.
    pub fn build_message(&self, subject: &str, text: &str, html: &str) -> Result<Message, EmailError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(self.config.to_address.parse()?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    /// Send one message. No retry.
    pub async fn deliver(&self, subject: &str, text: &str, html: &str) -> Result<(), EmailError> {
        let email = self.build_message(subject, text, html)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
                .timeout(Some(self.config.timeout));

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = %self.config.to_address, subject, "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config() -> EmailConfig {
        EmailConfig::from_lookup(lookup(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("CONTACT_EMAIL_TO", "hello@logicton.example"),
        ]))
        .unwrap()
        .unwrap()
    }

    #[test]
    fn disabled_without_smtp_host() {
        assert!(EmailConfig::from_lookup(lookup(&[])).unwrap().is_none());
    }

    #[test]
    fn recipient_required_with_smtp_host() {
        let result = EmailConfig::from_lookup(lookup(&[("SMTP_HOST", "smtp.example.com")]));
        assert_matches!(result, Err(EmailError::Config(_)));
    }

    #[test]
    fn defaults_applied() {
        let config = config();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.from_address, "noreply@logicton.local");
        assert!(config.smtp_user.is_none());
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn builds_multipart_message() {
        let delivery = EmailDelivery::new(config());
        let message = delivery
            .build_message("New Contact Form Message: Hi", "plain", "<p>html</p>")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("To: hello@logicton.example"));
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let mut config = config();
        config.to_address = "not-an-email".into();
        let result = EmailDelivery::new(config).build_message("s", "t", "h");
        assert_matches!(result, Err(EmailError::Address(_)));
    }
}
