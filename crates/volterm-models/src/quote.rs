//! # Quote Snapshot Module
//!
//! Ephemeral last-price snapshot for an underlying.

use crate::ticker::Ticker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time quote for an underlying. Replaced wholesale on every fetch.
///
/// # Fields
/// * `price` - Last traded price.
/// * `previous_close` - Prior session close, when the provider reports it.
/// * `bid` / `ask` - Top of book, when the provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: Ticker,
    pub price: f64,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Builds a quote, deriving change fields from the previous close.
    pub fn from_last(ticker: Ticker, price: f64, previous_close: Option<f64>) -> Self {
        let change = previous_close.map(|pc| price - pc);
        let change_pct = previous_close
            .filter(|pc| *pc != 0.0)
            .map(|pc| (price - pc) / pc * 100.0);
        Self {
            ticker,
            price,
            previous_close,
            change,
            change_pct,
            bid: None,
            ask: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches top-of-book levels.
    pub fn with_book(mut self, bid: f64, ask: f64) -> Self {
        self.bid = Some(bid);
        self.ask = Some(ask);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_derivation() {
        let q = Quote::from_last(Ticker::Spy, 505.0, Some(500.0));
        assert_eq!(q.change, Some(5.0));
        assert!((q.change_pct.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_previous_close() {
        let q = Quote::from_last(Ticker::Vix, 15.0, None);
        assert!(q.change.is_none());
        assert!(q.change_pct.is_none());
    }
}
