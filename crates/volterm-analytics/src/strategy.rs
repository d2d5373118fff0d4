//! # Strategy Engine Module
//!
//! Per-leg and aggregate Greeks plus a P&L curve for multi-leg positions.
//!
//! ## Description
//! The engine is pure over its inputs: it never mutates the position. Each
//! leg is valued with Black-Scholes at a volatility interpolated from the
//! IV surface at the leg's moneyness and tenor, then aggregated by signed
//! quantity. Legs with a malformed strike are excluded and reported while
//! the rest of the position is still computed; expired legs fall back to
//! intrinsic-value payoff.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions
//! - Black-Scholes (1973) model

use crate::greeks::OptionGreeks;
use crate::pricing::black_scholes;
use crate::surface::IvSurface;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use volterm_core::{AnalyticsConfig, DataError};
use volterm_models::OptionType;

/// Volatility assumed when the surface cannot answer for a leg.
const FALLBACK_VOL: f64 = 0.20;

/// Individual component of a multi-leg position.
///
/// # Fields
/// * `quantity` - Signed weight (positive = long, negative = short).
/// * `entry_price` - Premium paid (long) or received (short) per unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyLeg {
    pub option_type: OptionType,
    pub strike: f64,
    pub expiration: NaiveDate,
    pub quantity: i32,
    pub entry_price: f64,
}

impl StrategyLeg {
    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }
}

/// Ordered sequence of legs forming one position. Owned by the UI session;
/// the engine treats it as read-only input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyPosition {
    pub legs: Vec<StrategyLeg>,
}

impl StrategyPosition {
    /// Net cash flow at entry: positive = debit, negative = credit.
    pub fn net_premium(&self) -> f64 {
        self.legs
            .iter()
            .map(|leg| leg.entry_price * leg.quantity as f64)
            .sum()
    }
}

/// One sample of the position P&L curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PnlPoint {
    pub price: f64,
    pub pnl: f64,
}

/// Chart-ready evaluation of a position.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAnalysis {
    /// Aggregate Greeks at the current spot.
    pub greeks: OptionGreeks,
    /// (underlying price, P&L) samples across the configured range.
    pub curve: Vec<PnlPoint>,
    /// Legs rejected during evaluation, by index.
    pub excluded: Vec<DataError>,
}

/// Evaluates positions against a price grid and an IV surface.
#[derive(Debug, Clone)]
pub struct StrategyEngine {
    rate: f64,
    range_pct: f64,
    steps: usize,
}

impl StrategyEngine {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            rate: config.risk_free_rate,
            range_pct: config.pnl_range_pct,
            steps: config.pnl_steps,
        }
    }

    /// Computes aggregate Greeks and the P&L curve.
    ///
    /// A position with zero legs yields a zero curve and zero Greeks. The
    /// surface is optional: without one, every leg prices at the fallback
    /// volatility.
    pub fn evaluate(
        &self,
        position: &StrategyPosition,
        spot: f64,
        today: NaiveDate,
        surface: Option<&IvSurface>,
    ) -> StrategyAnalysis {
        let mut excluded = Vec::new();
        let mut legs = Vec::new();

        for (index, leg) in position.legs.iter().enumerate() {
            if !leg.strike.is_finite() || leg.strike <= 0.0 {
                warn!("excluding leg {index}: strike {} unusable", leg.strike);
                excluded.push(DataError::InvalidLeg {
                    index,
                    reason: format!("invalid strike {}", leg.strike),
                });
                continue;
            }
            let time = (leg.expiration - today).num_days() as f64 / 365.0;
            let vol = surface
                .and_then(|s| s.iv_at(leg.strike / spot, time * 365.0))
                .unwrap_or(FALLBACK_VOL);
            legs.push((leg, time, vol));
        }

        let greeks = legs.iter().fold(OptionGreeks::default(), |acc, (leg, time, vol)| {
            acc.add(
                &OptionGreeks::of(leg.option_type, spot, leg.strike, *time, self.rate, *vol)
                    .scale(leg.quantity as f64),
            )
        });

        let lo = spot * (1.0 - self.range_pct);
        let hi = spot * (1.0 + self.range_pct);
        let step = (hi - lo) / (self.steps as f64 - 1.0);
        let curve = (0..self.steps)
            .map(|i| {
                let price = lo + step * i as f64;
                let pnl = legs
                    .iter()
                    .map(|(leg, time, vol)| {
                        let value = black_scholes(
                            leg.option_type,
                            price,
                            leg.strike,
                            *time,
                            self.rate,
                            *vol,
                        );
                        (value - leg.entry_price) * leg.quantity as f64
                    })
                    .sum();
                PnlPoint { price, pnl }
            })
            .collect();

        StrategyAnalysis {
            greeks,
            curve,
            excluded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    fn engine() -> StrategyEngine {
        StrategyEngine::new(&AnalyticsConfig::default())
    }

    #[test]
    fn test_empty_position_is_flat_zero() {
        let analysis = engine().evaluate(&StrategyPosition::default(), 500.0, today(), None);
        assert_eq!(analysis.greeks, OptionGreeks::default());
        assert_eq!(analysis.curve.len(), 61);
        assert!(analysis.curve.iter().all(|p| p.pnl == 0.0));
        assert!(analysis.excluded.is_empty());
    }

    #[test]
    fn test_synthetic_forward_parity() {
        // Long call + short put at the same strike and expiry replicates a
        // forward: by put-call parity, pnl(S) - S is constant across the
        // whole curve.
        let expiration = today() + chrono::Duration::days(30);
        let position = StrategyPosition {
            legs: vec![
                StrategyLeg {
                    option_type: OptionType::Call,
                    strike: 500.0,
                    expiration,
                    quantity: 1,
                    entry_price: 10.0,
                },
                StrategyLeg {
                    option_type: OptionType::Put,
                    strike: 500.0,
                    expiration,
                    quantity: -1,
                    entry_price: 8.0,
                },
            ],
        };
        let analysis = engine().evaluate(&position, 500.0, today(), None);
        let residuals: Vec<f64> = analysis.curve.iter().map(|p| p.pnl - p.price).collect();
        let first = residuals[0];
        for r in &residuals {
            assert!((r - first).abs() < 1e-6, "parity residual drift: {r} vs {first}");
        }
        // Synthetic forward has unit delta and no gamma or vega.
        assert!((analysis.greeks.delta - 1.0).abs() < 1e-9);
        assert!(analysis.greeks.gamma.abs() < 1e-12);
        assert!(analysis.greeks.vega.abs() < 1e-12);
    }

    #[test]
    fn test_invalid_leg_excluded_rest_computed() {
        let expiration = today() + chrono::Duration::days(30);
        let position = StrategyPosition {
            legs: vec![
                StrategyLeg {
                    option_type: OptionType::Call,
                    strike: -5.0,
                    expiration,
                    quantity: 1,
                    entry_price: 1.0,
                },
                StrategyLeg {
                    option_type: OptionType::Call,
                    strike: 500.0,
                    expiration,
                    quantity: 1,
                    entry_price: 10.0,
                },
            ],
        };
        let analysis = engine().evaluate(&position, 500.0, today(), None);
        assert_eq!(analysis.excluded.len(), 1);
        assert!(matches!(
            analysis.excluded[0],
            DataError::InvalidLeg { index: 0, .. }
        ));
        // The valid long call still produces positive delta.
        assert!(analysis.greeks.delta > 0.3);
    }

    #[test]
    fn test_expired_leg_prices_intrinsic() {
        let position = StrategyPosition {
            legs: vec![StrategyLeg {
                option_type: OptionType::Call,
                strike: 500.0,
                expiration: today(), // zero days left
                quantity: 1,
                entry_price: 0.0,
            }],
        };
        let analysis = engine().evaluate(&position, 500.0, today(), None);
        // Hockey-stick payoff: flat at zero below strike, linear above.
        let below = analysis.curve.iter().find(|p| p.price < 450.0).unwrap();
        assert_eq!(below.pnl, 0.0);
        let above = analysis.curve.last().unwrap();
        assert!((above.pnl - (above.price - 500.0)).abs() < 1e-9);
    }

    #[test]
    fn test_position_not_mutated() {
        let expiration = today() + chrono::Duration::days(30);
        let position = StrategyPosition {
            legs: vec![StrategyLeg {
                option_type: OptionType::Put,
                strike: 490.0,
                expiration,
                quantity: 2,
                entry_price: 4.0,
            }],
        };
        let snapshot = format!("{position:?}");
        let _ = engine().evaluate(&position, 500.0, today(), None);
        assert_eq!(format!("{position:?}"), snapshot);
    }
}
