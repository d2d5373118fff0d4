//! # Option Greeks Module
//!
//! Analytic sensitivities from the same closed-form model as pricing.
//!
//! ## Description
//! Delta, gamma, theta (per calendar day), and vega (per volatility point)
//! computed analytically from Black-Scholes. `add` and `scale` support
//! signed-quantity aggregation across strategy legs.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use crate::pricing::{d1_d2, norm_cdf, norm_pdf};
use serde::{Deserialize, Serialize};
use volterm_models::OptionType;

/// First- and second-order sensitivities of an option position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionGreeks {
    pub delta: f64,
    pub gamma: f64,
    /// Value decay per calendar day.
    pub theta: f64,
    /// Value change per one volatility point (0.01).
    pub vega: f64,
}

impl OptionGreeks {
    /// Analytic Greeks for a single contract.
    ///
    /// Expired or zero-vol inputs return all-zero Greeks; the position is
    /// pure intrinsic value at that point and has no sensitivities worth
    /// charting.
    pub fn of(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        time: f64,
        rate: f64,
        volatility: f64,
    ) -> Self {
        if time <= 0.0 || volatility <= 0.0 {
            return Self::default();
        }

        let (d1, d2) = d1_d2(spot, strike, time, rate, volatility);
        let sqrt_t = time.sqrt();
        let discounted_strike = strike * (-rate * time).exp();
        let pdf_d1 = norm_pdf(d1);

        let delta = match option_type {
            OptionType::Call => norm_cdf(d1),
            OptionType::Put => norm_cdf(d1) - 1.0,
        };
        let gamma = pdf_d1 / (spot * volatility * sqrt_t);
        let theta_annual = match option_type {
            OptionType::Call => {
                -spot * pdf_d1 * volatility / (2.0 * sqrt_t) - rate * discounted_strike * norm_cdf(d2)
            }
            OptionType::Put => {
                -spot * pdf_d1 * volatility / (2.0 * sqrt_t) + rate * discounted_strike * norm_cdf(-d2)
            }
        };
        let vega = spot * pdf_d1 * sqrt_t / 100.0;

        Self {
            delta,
            gamma,
            theta: theta_annual / 365.0,
            vega,
        }
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
        }
    }

    /// Component-wise scaling by a signed quantity.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
        }
    }
}
