//! # Term Structure Mapper Module
//!
//! ATM implied volatility mapped onto the standard tenor set.
//!
//! ## Description
//! For each expiration, locates the strike nearest spot, averages the call
//! and put IV at that strike, then snaps the expiration's calendar distance
//! onto the nearest standard tenor. Ties between tenors resolve toward the
//! shorter one; when several expirations land on the same tenor, the one
//! closest to the tenor's nominal day count wins.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use chrono::NaiveDate;
use serde::Serialize;
use volterm_core::{AnalyticsConfig, TenorBucket};
use volterm_models::{ExpirySlice, OptionChain};

/// ATM IV at one standard tenor.
#[derive(Debug, Clone, Serialize)]
pub struct TermStructurePoint {
    pub tenor: &'static str,
    pub tenor_days: i64,
    pub expiration: NaiveDate,
    pub dte: i64,
    pub atm_strike: f64,
    pub atm_iv: f64,
}

/// Maps chains onto the configured tenor buckets.
#[derive(Debug, Clone)]
pub struct TermStructureMapper {
    tenors: &'static [TenorBucket],
}

impl TermStructureMapper {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            tenors: config.tenors,
        }
    }

    /// Mapper over an explicit tenor table.
    pub fn with_tenors(tenors: &'static [TenorBucket]) -> Self {
        Self { tenors }
    }

    /// Produces one point per occupied tenor, ordered shortest tenor first.
    pub fn map(&self, chain: &OptionChain) -> Vec<TermStructurePoint> {
        let mut by_tenor: Vec<Option<TermStructurePoint>> = vec![None; self.tenors.len()];

        for slice in &chain.expirations {
            let Some((atm_strike, atm_iv)) = atm_iv(slice, chain.spot) else {
                continue;
            };
            let tenor_idx = self.nearest_tenor(slice.dte);
            let tenor = &self.tenors[tenor_idx];
            let candidate = TermStructurePoint {
                tenor: tenor.label,
                tenor_days: tenor.days,
                expiration: slice.expiration,
                dte: slice.dte,
                atm_strike,
                atm_iv,
            };
            match &by_tenor[tenor_idx] {
                Some(held)
                    if (held.dte - tenor.days).abs() <= (candidate.dte - tenor.days).abs() => {}
                _ => by_tenor[tenor_idx] = Some(candidate),
            }
        }

        by_tenor.into_iter().flatten().collect()
    }

    /// Nearest tenor by absolute day distance; ties go to the shorter tenor.
    fn nearest_tenor(&self, dte: i64) -> usize {
        let mut best = 0;
        for (i, tenor) in self.tenors.iter().enumerate() {
            // Strict inequality keeps the earlier (shorter) tenor on ties.
            if (dte - tenor.days).abs() < (dte - self.tenors[best].days).abs() {
                best = i;
            }
        }
        best
    }
}

/// Strike nearest spot and the mean IV of the contracts quoted there.
fn atm_iv(slice: &ExpirySlice, spot: f64) -> Option<(f64, f64)> {
    let strikes = slice.strikes();
    let atm_strike = strikes
        .into_iter()
        .min_by(|a, b| (a - spot).abs().total_cmp(&(b - spot).abs()))?;
    let ivs: Vec<f64> = slice
        .at_strike(atm_strike)
        .map(|c| c.implied_volatility)
        .collect();
    if ivs.is_empty() {
        return None;
    }
    Some((atm_strike, ivs.iter().sum::<f64>() / ivs.len() as f64))
}
