use std::sync::Arc;

use logicton_core::content::ContentDir;
use logicton_core::rate_limit::{InMemoryRateLimiter, RateLimiter};
use logicton_core::upload::ImageStore;
use logicton_db::PgRateLimiter;
use logicton_notify::delivery::{EmailDelivery, WebhookDelivery};
use logicton_notify::{ContactNotifier, NotificationChannel, NotifyError};

use crate::config::{RateLimitBackend, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub pool: logicton_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Contact-form submission limiter.
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub notifier: Arc<ContactNotifier>,
    /// Upload target below `<public_dir>/images`.
    pub images: ImageStore,
    /// JSON content files.
    pub content: ContentDir,
}

impl AppState {
    /// Wire up the rate limiter and notification channels the configuration
    /// asks for.
    pub fn from_config(pool: logicton_db::DbPool, config: ServerConfig) -> Result<Self, NotifyError> {
        let rate_limiter: Arc<dyn RateLimiter> = match config.rate_limit_backend {
            RateLimitBackend::Memory => Arc::new(InMemoryRateLimiter::new(config.rate_limit)),
            RateLimitBackend::Postgres => {
                Arc::new(PgRateLimiter::new(pool.clone(), config.rate_limit))
            }
        };

        let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();
        if let Some(email) = &config.email {
            channels.push(Arc::new(EmailDelivery::new(email.clone())));
        }
        if let Some(url) = &config.chat_webhook_url {
            channels.push(Arc::new(WebhookDelivery::new(url.clone())?));
        }
        let notifier = ContactNotifier::new(channels).with_timeout(config.notify_timeout);

        Ok(Self::new(pool, config, rate_limiter, notifier))
    }

    pub fn new(
        pool: logicton_db::DbPool,
        config: ServerConfig,
        rate_limiter: Arc<dyn RateLimiter>,
        notifier: ContactNotifier,
    ) -> Self {
        Self {
            pool,
            images: ImageStore::new(&config.public_dir),
            content: ContentDir::new(&config.content_dir),
            config: Arc::new(config),
            rate_limiter,
            notifier: Arc::new(notifier),
        }
    }
}
