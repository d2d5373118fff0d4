//! # Chain Assembler Module
//!
//! Normalizes raw provider payloads into typed, invariant-checked chains.
//!
//! ## Description
//! Parses expiration dates, drops expirations already past or beyond the
//! configured horizon, coerces optional numerics, discards contracts
//! without a usable bid/ask/IV, and enforces strike uniqueness per option
//! type. A payload with zero usable contracts is `MalformedChain`, which
//! the caller treats as a degrade-to-simulated trigger rather than a hard
//! error.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use chrono::NaiveDate;
use tracing::debug;
use volterm_core::{AnalyticsConfig, DataError};
use volterm_models::{
    ExpirySlice, OptionChain, OptionContract, OptionType, RawChain, RawContract, Ticker,
};

/// Builds normalized [`OptionChain`] values from raw payloads.
#[derive(Debug, Clone)]
pub struct ChainAssembler {
    /// Number of nearest expirations kept.
    horizon: usize,
}

impl ChainAssembler {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            horizon: config.chain_horizon,
        }
    }

    /// Normalizes `raw` against the given spot and fetch date.
    ///
    /// # Errors
    /// [`DataError::MalformedChain`] when no expiration yields a usable
    /// contract.
    pub fn assemble(
        &self,
        raw: &RawChain,
        ticker: Ticker,
        spot: f64,
        today: NaiveDate,
    ) -> Result<OptionChain, DataError> {
        let mut slices: Vec<ExpirySlice> = Vec::new();

        let mut dated: Vec<(NaiveDate, &volterm_models::RawExpiry)> = Vec::new();
        for expiry in &raw.expirations {
            match NaiveDate::parse_from_str(&expiry.expiration, "%Y-%m-%d") {
                Ok(date) if date >= today => dated.push((date, expiry)),
                Ok(date) => debug!("dropping past expiration {date}"),
                Err(_) => debug!("dropping unparseable expiration {:?}", expiry.expiration),
            }
        }
        dated.sort_by_key(|(date, _)| *date);
        dated.truncate(self.horizon);

        for (date, expiry) in dated {
            let mut contracts: Vec<OptionContract> = Vec::new();
            for (rows, option_type) in [
                (&expiry.calls, OptionType::Call),
                (&expiry.puts, OptionType::Put),
            ] {
                for row in rows.iter() {
                    if let Some(contract) = coerce(row, option_type) {
                        // Strike uniqueness per type: first occurrence wins.
                        let duplicate = contracts.iter().any(|c| {
                            c.option_type == option_type && (c.strike - contract.strike).abs() < 1e-9
                        });
                        if !duplicate {
                            contracts.push(contract);
                        }
                    }
                }
            }
            if contracts.is_empty() {
                continue;
            }
            contracts.sort_by(|a, b| {
                a.strike
                    .total_cmp(&b.strike)
                    .then_with(|| (a.option_type as u8).cmp(&(b.option_type as u8)))
            });
            slices.push(ExpirySlice {
                expiration: date,
                dte: (date - today).num_days(),
                contracts,
            });
        }

        if slices.is_empty() {
            return Err(DataError::MalformedChain(format!(
                "no usable contracts for {ticker}"
            )));
        }

        debug!(
            "assembled {} chain: {} expirations, {} contracts",
            ticker,
            slices.len(),
            slices.iter().map(|s| s.contracts.len()).sum::<usize>()
        );

        Ok(OptionChain {
            ticker,
            spot,
            fetched: today,
            expirations: slices,
        })
    }
}

/// A contract is usable when it has a positive strike, a positive IV, and a
/// market on at least one side.
fn coerce(row: &RawContract, option_type: OptionType) -> Option<OptionContract> {
    let strike = row.strike.filter(|s| s.is_finite() && *s > 0.0)?;
    let iv = row.implied_volatility.filter(|v| v.is_finite() && *v > 0.0)?;
    let bid = row.bid.unwrap_or(0.0).max(0.0);
    let ask = row.ask.unwrap_or(0.0).max(0.0);
    if bid <= 0.0 && ask <= 0.0 {
        return None;
    }
    Some(OptionContract {
        strike,
        option_type,
        bid,
        ask,
        last_price: row.last_price.unwrap_or(0.0).max(0.0),
        implied_volatility: iv,
        open_interest: row.open_interest.unwrap_or(0.0).max(0.0) as u64,
        volume: row.volume.unwrap_or(0.0).max(0.0) as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use volterm_models::RawExpiry;

    fn raw_contract(strike: f64, iv: f64, bid: f64, ask: f64) -> RawContract {
        RawContract {
            strike: Some(strike),
            last_price: Some((bid + ask) / 2.0),
            bid: Some(bid),
            ask: Some(ask),
            volume: Some(100.0),
            open_interest: Some(500.0),
            implied_volatility: Some(iv),
        }
    }

    fn raw_expiry(date: &str, calls: Vec<RawContract>, puts: Vec<RawContract>) -> RawExpiry {
        RawExpiry {
            expiration: date.to_string(),
            dte: None,
            calls,
            puts,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    #[test]
    fn test_horizon_and_ordering() {
        let raw = RawChain {
            ticker: "SPY".into(),
            spot: None,
            expirations: vec![
                raw_expiry("2026-12-18", vec![raw_contract(500.0, 0.2, 1.0, 1.2)], vec![]),
                raw_expiry("2026-09-18", vec![raw_contract(500.0, 0.2, 1.0, 1.2)], vec![]),
                raw_expiry("2026-10-16", vec![raw_contract(500.0, 0.2, 1.0, 1.2)], vec![]),
                raw_expiry("2026-11-20", vec![raw_contract(500.0, 0.2, 1.0, 1.2)], vec![]),
                raw_expiry("2027-01-15", vec![raw_contract(500.0, 0.2, 1.0, 1.2)], vec![]),
            ],
        };
        let assembler = ChainAssembler::new(&AnalyticsConfig::default());
        let chain = assembler.assemble(&raw, Ticker::Spy, 500.0, today()).unwrap();

        assert_eq!(chain.expirations.len(), 4, "horizon keeps first 4");
        let dates: Vec<NaiveDate> = chain.expirations.iter().map(|e| e.expiration).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted, "expirations must ascend");
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 9, 18).unwrap());
    }

    #[test]
    fn test_unusable_rows_dropped() {
        let mut no_iv = raw_contract(505.0, 0.2, 1.0, 1.2);
        no_iv.implied_volatility = Some(0.0);
        let mut no_market = raw_contract(510.0, 0.2, 0.0, 0.0);
        no_market.bid = None;

        let raw = RawChain {
            ticker: "SPY".into(),
            spot: None,
            expirations: vec![raw_expiry(
                "2026-09-18",
                vec![raw_contract(500.0, 0.2, 1.0, 1.2), no_iv, no_market],
                vec![],
            )],
        };
        let assembler = ChainAssembler::new(&AnalyticsConfig::default());
        let chain = assembler.assemble(&raw, Ticker::Spy, 500.0, today()).unwrap();
        assert_eq!(chain.contract_count(), 1);
    }

    #[test]
    fn test_past_expirations_dropped() {
        let raw = RawChain {
            ticker: "SPY".into(),
            spot: None,
            expirations: vec![
                raw_expiry("2026-08-21", vec![raw_contract(500.0, 0.2, 1.0, 1.2)], vec![]),
                raw_expiry("2026-09-18", vec![raw_contract(500.0, 0.2, 1.0, 1.2)], vec![]),
            ],
        };
        let assembler = ChainAssembler::new(&AnalyticsConfig::default());
        let chain = assembler.assemble(&raw, Ticker::Spy, 500.0, today()).unwrap();
        assert_eq!(chain.expirations.len(), 1);
        assert!(chain.expirations[0].expiration >= chain.fetched);
    }

    #[test]
    fn test_duplicate_strikes_collapse() {
        let raw = RawChain {
            ticker: "SPY".into(),
            spot: None,
            expirations: vec![raw_expiry(
                "2026-09-18",
                vec![
                    raw_contract(500.0, 0.18, 1.0, 1.2),
                    raw_contract(500.0, 0.99, 9.0, 9.2),
                ],
                vec![raw_contract(500.0, 0.19, 1.1, 1.3)],
            )],
        };
        let assembler = ChainAssembler::new(&AnalyticsConfig::default());
        let chain = assembler.assemble(&raw, Ticker::Spy, 500.0, today()).unwrap();
        // One call (first wins) plus one put at the same strike.
        assert_eq!(chain.contract_count(), 2);
        let call = chain.expirations[0]
            .contracts
            .iter()
            .find(|c| c.option_type == OptionType::Call)
            .unwrap();
        assert!((call.implied_volatility - 0.18).abs() < 1e-12);
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        let raw = RawChain::default();
        let assembler = ChainAssembler::new(&AnalyticsConfig::default());
        let err = assembler
            .assemble(&raw, Ticker::Spy, 500.0, today())
            .unwrap_err();
        assert!(matches!(err, DataError::MalformedChain(_)));
    }
}
