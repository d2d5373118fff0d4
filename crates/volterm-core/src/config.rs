//! # Analytics Configuration Module
//!
//! One table for every grid, tenor, and quota constant.
//!
//! ## Description
//! The moneyness grid, the standard tenor set, the P&L sampling range, and
//! the remote provider's quota all live here so that the surface builder,
//! the term-structure mapper, and the arbiter stay consistent by
//! construction instead of by scattered literals.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use serde::Serialize;
use std::time::Duration;

/// A standard time-to-expiration bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TenorBucket {
    pub label: &'static str,
    /// Nominal calendar-day count of the bucket.
    pub days: i64,
}

/// The fixed ordered tenor set, shortest first.
pub const STANDARD_TENORS: [TenorBucket; 5] = [
    TenorBucket { label: "1W", days: 7 },
    TenorBucket { label: "1M", days: 30 },
    TenorBucket { label: "3M", days: 91 },
    TenorBucket { label: "6M", days: 182 },
    TenorBucket { label: "1Y", days: 365 },
];

/// Shared configuration for the data and analytics pipeline.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Lower edge of the moneyness grid (strike / spot).
    pub moneyness_min: f64,
    /// Upper edge of the moneyness grid.
    pub moneyness_max: f64,
    /// Number of buckets across the grid, inclusive of both edges.
    pub moneyness_buckets: usize,
    /// Maximum expirations sampled into the IV surface.
    pub surface_expiries: usize,
    /// Expirations kept when assembling a chain.
    pub chain_horizon: usize,
    /// Standard tenor buckets for the term structure.
    pub tenors: &'static [TenorBucket],
    /// Continuously compounded risk-free rate used for pricing.
    pub risk_free_rate: f64,
    /// P&L curve half-range as a fraction of spot.
    pub pnl_range_pct: f64,
    /// Sample count across the P&L price range.
    pub pnl_steps: usize,
    /// Remote provider free-tier quota per window.
    pub remote_quota: u32,
    /// Remote provider quota window.
    pub remote_window: Duration,
    /// How long a health-probe result stays trusted.
    pub probe_ttl: Duration,
    /// Per-request network timeout; expiry counts as a source failure.
    pub fetch_timeout: Duration,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            moneyness_min: 0.8,
            moneyness_max: 1.2,
            moneyness_buckets: 21,
            surface_expiries: 6,
            chain_horizon: 4,
            tenors: &STANDARD_TENORS,
            risk_free_rate: 0.045,
            pnl_range_pct: 0.30,
            pnl_steps: 61,
            remote_quota: 5,
            remote_window: Duration::from_secs(60),
            probe_ttl: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(4),
        }
    }
}

impl AnalyticsConfig {
    /// Distance between adjacent moneyness buckets.
    pub fn bucket_step(&self) -> f64 {
        (self.moneyness_max - self.moneyness_min) / (self.moneyness_buckets as f64 - 1.0)
    }

    /// The full moneyness grid, ascending, covering [min, max] inclusive.
    pub fn moneyness_grid(&self) -> Vec<f64> {
        let step = self.bucket_step();
        (0..self.moneyness_buckets)
            .map(|i| self.moneyness_min + step * i as f64)
            .collect()
    }
}
