//! # Rate Limiter Module
//!
//! Token-bucket guard for the remote provider's free-tier quota.
//!
//! ## Description
//! Tokens refill continuously at quota/window and cap at the quota. Each
//! `try_acquire` is non-blocking: it consumes one token when available and
//! returns `false` otherwise. Nothing is queued; callers fall back to a
//! lower-tier source or wait.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use std::time::{Duration, Instant};
use tracing::warn;

/// Token bucket sized to the provider's quota.
pub struct RateLimiter {
    quota: u32,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
    /// Name for logging.
    name: String,
}

impl RateLimiter {
    /// Builds a full bucket allowing `quota` requests per `window`.
    pub fn new(name: &str, quota: u32, window: Duration) -> Self {
        Self {
            quota,
            tokens: quota as f64,
            refill_per_sec: quota as f64 / window.as_secs_f64(),
            last_refill: Instant::now(),
            name: name.to_string(),
        }
    }

    /// Consumes one token if available. Never blocks.
    pub fn try_acquire(&mut self) -> bool {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            warn!("[RATE_LIMIT] {} quota exhausted - request rejected", self.name);
            metrics::counter!("volterm_rate_limited_total").increment(1);
            false
        }
    }

    /// Tokens currently available, after refill.
    pub fn available(&mut self) -> f64 {
        self.refill();
        self.tokens
    }

    fn refill(&mut self) {
        let elapsed = self.last_refill.elapsed().as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.quota as f64);
        self.last_refill = Instant::now();
    }
}
