//! Delivery backends.
//!
//! - [`email`] sends multipart (HTML + text) email over SMTP.
//! - [`webhook`] posts a text message to a chat incoming-webhook URL.
//!
//! Each delivery makes exactly one attempt.

pub mod email;
pub mod webhook;

pub use email::{EmailConfig, EmailDelivery, EmailError};
pub use webhook::{WebhookDelivery, WebhookError};
