//! Fixed-window submission limiting.
//!
//! [`RateLimiter`] is the seam: the API depends on the trait and the
//! deployment picks a backing store. [`InMemoryRateLimiter`] keeps windows in
//! process memory (single instance only); the Postgres-backed implementation
//! in `logicton_db` shares windows across instances.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;

use crate::error::CoreError;

/// Default window length (15 minutes).
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Longest window a deployment may configure.
pub const MAX_WINDOW: Duration = Duration::from_secs(366 * 24 * 60 * 60);

/// Default number of submissions allowed per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Probability that a single check also sweeps expired windows.
pub const SWEEP_PROBABILITY: f64 = 0.01;

/// Limit parameters shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Counts one attempt for `key` and decides whether it may proceed.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, key: &str) -> Result<RateDecision, CoreError>;
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    /// `None` when `now + window` is not representable; such a window never resets.
    reset_at: Option<Instant>,
}

impl Window {
    fn open(now: Instant, length: Duration) -> Self {
        Self {
            count: 0,
            reset_at: now.checked_add(length),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.reset_at.map_or(true, |reset_at| now <= reset_at)
    }
}

/// Process-local fixed-window limiter.
///
/// Expired windows are removed opportunistically: each check has a
/// [`SWEEP_PROBABILITY`] chance of sweeping the whole table.
pub struct InMemoryRateLimiter {
    policy: RateLimitPolicy,
    sweep_probability: f64,
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_sweep_probability(policy, SWEEP_PROBABILITY)
    }

    pub fn with_sweep_probability(policy: RateLimitPolicy, sweep_probability: f64) -> Self {
        Self {
            policy,
            sweep_probability: sweep_probability.clamp(0.0, 1.0),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check `key` as of `now`.
    ///
    /// An attempt past the limit does not extend or increment the window.
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let decision = {
            let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
            let window = windows
                .entry(key.to_string())
                .or_insert_with(|| Window::open(now, self.policy.window));
            if !window.is_live(now) {
                *window = Window::open(now, self.policy.window);
            }

            if window.count >= self.policy.max_requests {
                RateDecision::Limited {
                    retry_after: window
                        .reset_at
                        .map_or(self.policy.window, |reset_at| {
                            reset_at.saturating_duration_since(now)
                        }),
                }
            } else {
                window.count += 1;
                RateDecision::Allowed {
                    remaining: self.policy.max_requests - window.count,
                }
            }
        };

        if rand::rng().random_bool(self.sweep_probability) {
            let removed = self.sweep_expired(now);
            if removed > 0 {
                tracing::debug!(removed, "Swept expired rate-limit windows");
            }
        }

        decision
    }

    /// Drop every window that expired before `now`. Returns how many were removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let before = windows.len();
        windows.retain(|_, w| w.is_live(now));
        before - windows.len()
    }

    /// Number of tracked keys.
    pub fn tracked_keys(&self) -> usize {
        self.windows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, CoreError> {
        Ok(self.check_at(key, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn limiter() -> InMemoryRateLimiter {
        InMemoryRateLimiter::with_sweep_probability(RateLimitPolicy::default(), 0.0)
    }

    #[test]
    fn sixth_request_in_window_is_limited() {
        let limiter = limiter();
        let start = Instant::now();

        for i in 0..5 {
            let decision = limiter.check_at("203.0.113.7", start + Duration::from_secs(i));
            assert!(decision.is_allowed(), "request {} should pass", i + 1);
        }

        let sixth = limiter.check_at("203.0.113.7", start + Duration::from_secs(60));
        assert_matches!(sixth, RateDecision::Limited { retry_after } => {
            assert_eq!(retry_after, DEFAULT_WINDOW - Duration::from_secs(60));
        });
    }

    #[test]
    fn new_window_after_expiry() {
        let limiter = limiter();
        let start = Instant::now();
        for _ in 0..6 {
            limiter.check_at("ip", start);
        }
        assert!(!limiter.check_at("ip", start).is_allowed());

        let later = start + DEFAULT_WINDOW + Duration::from_secs(1);
        assert_eq!(
            limiter.check_at("ip", later),
            RateDecision::Allowed { remaining: 4 }
        );
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter();
        let now = Instant::now();
        for _ in 0..5 {
            limiter.check_at("a", now);
        }
        assert!(!limiter.check_at("a", now).is_allowed());
        assert!(limiter.check_at("b", now).is_allowed());
    }

    #[test]
    fn sweep_removes_only_expired_windows() {
        let limiter = limiter();
        let start = Instant::now();
        limiter.check_at("old", start);
        limiter.check_at("fresh", start + DEFAULT_WINDOW);

        let removed = limiter.sweep_expired(start + DEFAULT_WINDOW + Duration::from_secs(1));
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn always_sweeping_limiter_cleans_up_on_check() {
        let limiter =
            InMemoryRateLimiter::with_sweep_probability(RateLimitPolicy::default(), 1.0);
        let start = Instant::now();
        limiter.check_at("old", start);
        limiter.check_at("new", start + DEFAULT_WINDOW + Duration::from_secs(1));
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[tokio::test]
    async fn trait_check_counts_attempts() {
        let limiter = InMemoryRateLimiter::with_sweep_probability(
            RateLimitPolicy {
                max_requests: 1,
                window: Duration::from_secs(60),
            },
            0.0,
        );
        assert!(limiter.check("k").await.unwrap().is_allowed());
        assert!(!limiter.check("k").await.unwrap().is_allowed());
    }

    #[test]
    fn oversized_window_never_resets() {
        let limiter = InMemoryRateLimiter::with_sweep_probability(
            RateLimitPolicy {
                max_requests: 1,
                window: Duration::from_secs(u64::MAX),
            },
            0.0,
        );
        let start = Instant::now();

        assert!(limiter.check_at("ip", start).is_allowed());
        assert_matches!(
            limiter.check_at("ip", start + Duration::from_secs(86_400)),
            RateDecision::Limited { .. }
        );
        assert_eq!(limiter.sweep_expired(start + Duration::from_secs(86_400)), 0);
    }

    #[test]
    fn zero_allowance_limits_the_first_request() {
        let limiter = InMemoryRateLimiter::with_sweep_probability(
            RateLimitPolicy {
                max_requests: 0,
                window: DEFAULT_WINDOW,
            },
            0.0,
        );
        assert_eq!(
            limiter.check_at("ip", Instant::now()),
            RateDecision::Limited { retry_after: DEFAULT_WINDOW }
        );
    }
}
