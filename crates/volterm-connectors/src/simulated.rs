//! # Simulated Source Module
//!
//! Deterministic in-process data tier; the terminal's floor of last resort.
//!
//! ## Description
//! Generates quotes and option chains procedurally from per-ticker base
//! levels, a volatility smile, and an upward term drift. Output is seeded
//! by the ticker symbol, so repeated fetches of the same ticker on the
//! same day agree. This tier never fails: if it cannot produce data, the
//! terminal treats that as a fatal configuration error upstream.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use crate::source::QuoteSource;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use volterm_models::{Quote, RawChain, RawContract, RawExpiry, Ticker};

/// Days-to-expiration ladder of the generated chains.
const EXPIRY_LADDER: [i64; 6] = [7, 14, 30, 60, 91, 182];

/// Moneyness span of generated strikes, slightly wider than the surface
/// grid so the edge buckets stay populated.
const STRIKE_SPAN: (f64, f64) = (0.78, 1.22);
const STRIKE_STEP: f64 = 0.02;

/// Deterministic synthetic data tier.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource;

impl SimulatedSource {
    pub fn new() -> Self {
        Self
    }

    /// Reference level the generator anchors each ticker to.
    pub fn base_price(ticker: Ticker) -> f64 {
        match ticker {
            Ticker::Spy => 500.0,
            Ticker::Spx => 5030.0,
            Ticker::Qqq => 430.0,
            Ticker::Iwm => 200.0,
            Ticker::Vix => 15.5,
            Ticker::Es => 5055.0,
        }
    }

    /// Base ATM volatility per underlying.
    fn base_vol(ticker: Ticker) -> f64 {
        match ticker {
            Ticker::Spy | Ticker::Spx | Ticker::Es => 0.15,
            Ticker::Qqq => 0.20,
            Ticker::Iwm => 0.22,
            Ticker::Vix => 0.85,
        }
    }

    fn rng_for(ticker: Ticker) -> Pcg64Mcg {
        let mut hasher = DefaultHasher::new();
        ticker.symbol().hash(&mut hasher);
        Pcg64Mcg::seed_from_u64(hasher.finish())
    }

    /// Smile + term model: ATM vol drifts up with tenor, wings lift with
    /// squared moneyness distance, puts carry extra skew.
    fn smile_iv(ticker: Ticker, moneyness: f64, years: f64) -> f64 {
        let atm = Self::base_vol(ticker) * (1.0 + 0.12 * years.sqrt());
        let wings = 0.5 * (moneyness - 1.0).powi(2);
        let skew = 0.08 * (1.0 - moneyness);
        (atm + wings + skew).max(0.01)
    }
}

#[async_trait]
impl QuoteSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn probe(&self) -> bool {
        true
    }

    async fn fetch_quote(&self, ticker: Ticker) -> anyhow::Result<Quote> {
        let mut rng = Self::rng_for(ticker);
        let base = Self::base_price(ticker);
        let price = base * (1.0 + rng.gen_range(-0.005..0.005));
        let spread = (price * 0.0002).max(0.01);
        Ok(Quote::from_last(ticker, price, Some(base)).with_book(price - spread, price + spread))
    }

    async fn fetch_chain(&self, ticker: Ticker) -> anyhow::Result<RawChain> {
        let mut rng = Self::rng_for(ticker);
        let spot = Self::base_price(ticker);
        let today = Utc::now().date_naive();

        let mut expirations = Vec::with_capacity(EXPIRY_LADDER.len());
        for dte in EXPIRY_LADDER {
            let years = dte as f64 / 365.0;
            let mut calls = Vec::new();
            let mut puts = Vec::new();

            let mut moneyness = STRIKE_SPAN.0;
            while moneyness <= STRIKE_SPAN.1 + 1e-9 {
                let strike = (spot * moneyness * 100.0).round() / 100.0;
                let iv = Self::smile_iv(ticker, moneyness, years)
                    + rng.gen_range(-0.002..0.002);
                let liquidity = (-8.0 * (moneyness - 1.0).powi(2)).exp();

                for is_call in [true, false] {
                    let intrinsic = if is_call {
                        (spot - strike).max(0.0)
                    } else {
                        (strike - spot).max(0.0)
                    };
                    // Brenner-Subrahmanyam-style time value, damped away
                    // from the money.
                    let time_value = 0.4 * spot * iv * years.sqrt() * liquidity;
                    let mid = (intrinsic + time_value).max(0.01);
                    let half_spread = (mid * 0.02).max(0.01);
                    let row = RawContract {
                        strike: Some(strike),
                        last_price: Some(mid),
                        bid: Some((mid - half_spread).max(0.0)),
                        ask: Some(mid + half_spread),
                        volume: Some((liquidity * rng.gen_range(200.0..2000.0)).round()),
                        open_interest: Some((liquidity * rng.gen_range(1000.0..20000.0)).round()),
                        implied_volatility: Some(iv),
                    };
                    if is_call {
                        calls.push(row);
                    } else {
                        puts.push(row);
                    }
                }
                moneyness += STRIKE_STEP;
            }

            expirations.push(RawExpiry {
                expiration: (today + Duration::days(dte)).format("%Y-%m-%d").to_string(),
                dte: Some(dte),
                calls,
                puts,
            });
        }

        Ok(RawChain {
            ticker: ticker.symbol().to_string(),
            spot: Some(spot),
            expirations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chain_shape() {
        let chain = SimulatedSource::new().fetch_chain(Ticker::Spy).await.unwrap();
        assert_eq!(chain.expirations.len(), 6);
        assert_eq!(chain.spot, Some(500.0));
        for expiry in &chain.expirations {
            assert_eq!(expiry.calls.len(), expiry.puts.len());
            assert!(expiry.calls.len() >= 21, "strike ladder too sparse");
            for row in &expiry.calls {
                assert!(row.implied_volatility.unwrap() > 0.0);
                assert!(row.ask.unwrap() > 0.0);
            }
        }
    }

    #[tokio::test]
    async fn test_deterministic_per_ticker() {
        let source = SimulatedSource::new();
        let a = source.fetch_quote(Ticker::Qqq).await.unwrap();
        let b = source.fetch_quote(Ticker::Qqq).await.unwrap();
        assert_eq!(a.price, b.price);
        let c = source.fetch_quote(Ticker::Iwm).await.unwrap();
        assert_ne!(a.price, c.price);
    }

    #[tokio::test]
    async fn test_smile_has_positive_wings() {
        let atm = SimulatedSource::smile_iv(Ticker::Spy, 1.0, 30.0 / 365.0);
        let put_wing = SimulatedSource::smile_iv(Ticker::Spy, 0.85, 30.0 / 365.0);
        let call_wing = SimulatedSource::smile_iv(Ticker::Spy, 1.15, 30.0 / 365.0);
        assert!(put_wing > atm, "put wing should sit above ATM");
        assert!(call_wing > atm, "call wing should sit above ATM");
        assert!(put_wing > call_wing, "skew should favor the put side");
    }
}
