//! Postgres-backed [`RateLimiter`] shared by every API instance.

use std::time::Duration;

use async_trait::async_trait;
use logicton_core::error::CoreError;
use logicton_core::rate_limit::{RateDecision, RateLimitPolicy, RateLimiter, SWEEP_PROBABILITY};
use rand::Rng;

use crate::repositories::RateLimitRepo;
use crate::DbPool;

pub struct PgRateLimiter {
    pool: DbPool,
    policy: RateLimitPolicy,
    sweep_probability: f64,
}

impl PgRateLimiter {
    pub fn new(pool: DbPool, policy: RateLimitPolicy) -> Self {
        Self {
            pool,
            policy,
            sweep_probability: SWEEP_PROBABILITY,
        }
    }

    pub fn with_sweep_probability(mut self, probability: f64) -> Self {
        self.sweep_probability = probability.clamp(0.0, 1.0);
        self
    }

    async fn maybe_sweep(&self) {
        if !rand::rng().random_bool(self.sweep_probability) {
            return;
        }
        match RateLimitRepo::sweep_expired(&self.pool).await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Swept expired rate-limit windows"),
            Err(e) => tracing::warn!(error = %e, "Rate-limit sweep failed"),
        }
    }
}

#[async_trait]
impl RateLimiter for PgRateLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, CoreError> {
        let max = i32::try_from(self.policy.max_requests).unwrap_or(i32::MAX - 1);
        let window_secs = i64::try_from(self.policy.window.as_secs()).unwrap_or(i64::MAX);

        let state = RateLimitRepo::hit(&self.pool, key, window_secs, max)
            .await
            .map_err(|e| CoreError::Internal(format!("rate limit store: {e}")))?;

        self.maybe_sweep().await;

        if state.hits > max {
            let retry_after = (state.reset_at - chrono::Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            Ok(RateDecision::Limited { retry_after })
        } else {
            let hits = u32::try_from(state.hits).unwrap_or(0);
            Ok(RateDecision::Allowed {
                remaining: self.policy.max_requests.saturating_sub(hits),
            })
        }
    }
}
