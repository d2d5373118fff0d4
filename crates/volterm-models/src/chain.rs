//! # Normalized Option Chain Module
//!
//! Typed, invariant-checked option chain consumed by the analytics pipeline.
//!
//! ## Description
//! The assembler in `volterm-analytics` converts a `RawChain` into this
//! representation. Once built it is immutable: expirations are sorted
//! ascending and never earlier than the fetch date, and strikes are unique
//! within an expiration for a given option type. A chain is rebuilt
//! wholesale on every fetch; contracts are never mutated in place.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use crate::ticker::Ticker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classification of the option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

impl OptionType {
    /// Lowercase wire label (`"call"` / `"put"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

/// A single normalized contract. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    pub strike: f64,
    pub option_type: OptionType,
    pub bid: f64,
    pub ask: f64,
    pub last_price: f64,
    pub implied_volatility: f64,
    pub open_interest: u64,
    pub volume: u64,
}

impl OptionContract {
    /// Midpoint of the quoted market, falling back to whichever side exists.
    pub fn mid(&self) -> f64 {
        if self.bid > 0.0 && self.ask > 0.0 {
            (self.bid + self.ask) / 2.0
        } else {
            self.bid.max(self.ask)
        }
    }
}

/// Contracts sharing one expiration date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirySlice {
    pub expiration: NaiveDate,
    /// Calendar days between the chain's fetch date and `expiration`.
    pub dte: i64,
    /// Sorted by (strike, type); strike-unique per type.
    pub contracts: Vec<OptionContract>,
}

impl ExpirySlice {
    /// Distinct strikes in ascending order.
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.contracts.iter().map(|c| c.strike).collect();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        strikes
    }

    /// All contracts (call and put) at one strike.
    pub fn at_strike(&self, strike: f64) -> impl Iterator<Item = &OptionContract> {
        self.contracts
            .iter()
            .filter(move |c| (c.strike - strike).abs() < 1e-9)
    }
}

/// Normalized chain for one underlying. Expirations ascend, all >= `fetched`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    pub ticker: Ticker,
    pub spot: f64,
    pub fetched: NaiveDate,
    pub expirations: Vec<ExpirySlice>,
}

impl OptionChain {
    pub fn is_empty(&self) -> bool {
        self.expirations.iter().all(|e| e.contracts.is_empty())
    }

    /// Total contract count across all expirations.
    pub fn contract_count(&self) -> usize {
        self.expirations.iter().map(|e| e.contracts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(strike: f64, option_type: OptionType, iv: f64) -> OptionContract {
        OptionContract {
            strike,
            option_type,
            bid: 1.0,
            ask: 1.2,
            last_price: 1.1,
            implied_volatility: iv,
            open_interest: 10,
            volume: 5,
        }
    }

    #[test]
    fn test_strikes_dedup_across_types() {
        let slice = ExpirySlice {
            expiration: NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
            dte: 24,
            contracts: vec![
                contract(500.0, OptionType::Call, 0.18),
                contract(500.0, OptionType::Put, 0.19),
                contract(505.0, OptionType::Call, 0.17),
            ],
        };
        assert_eq!(slice.strikes(), vec![500.0, 505.0]);
        assert_eq!(slice.at_strike(500.0).count(), 2);
    }

    #[test]
    fn test_mid_one_sided() {
        let mut c = contract(500.0, OptionType::Call, 0.18);
        c.bid = 0.0;
        c.ask = 2.0;
        assert_eq!(c.mid(), 2.0);
    }
}
