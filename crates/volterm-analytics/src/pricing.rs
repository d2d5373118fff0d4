//! # Options Pricing Module
//!
//! Black-Scholes valuation for European-style treatment of listed options.
//!
//! ## Description
//! Provides the single closed-form pricing function used across the
//! strategy engine. Zero or negative time-to-expiration and zero
//! volatility both collapse to intrinsic value, which keeps the formula
//! free of division by zero at the edges of the P&L grid.
//!
//! ## References
//! - Black, F., & Scholes, M. (1973). The Pricing of Options and Corporate
//!   Liabilities. Journal of Political Economy, 81(3), 637-654.
//! - Abramowitz, M., & Stegun, I. A. (1964). Handbook of Mathematical
//!   Functions, Formula 7.1.26.
//! - IEEE Std 1016-2009: Software Design Descriptions

use std::f64::consts::PI;
use volterm_models::OptionType;

/// Standard normal cumulative distribution via the error function.
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / 2.0_f64.sqrt()))
}

/// Standard normal probability density.
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * PI).sqrt()
}

/// Abramowitz & Stegun 7.1.26 approximation, max error < 1.5e-7.
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// d1 and d2 of the Black-Scholes formula.
///
/// Caller guarantees `time > 0` and `volatility > 0`.
pub(crate) fn d1_d2(spot: f64, strike: f64, time: f64, rate: f64, volatility: f64) -> (f64, f64) {
    let sqrt_t = time.sqrt();
    let d1 = ((spot / strike).ln() + (rate + volatility * volatility / 2.0) * time)
        / (volatility * sqrt_t);
    (d1, d1 - volatility * sqrt_t)
}

/// Exercise value of the option, ignoring time value.
pub fn intrinsic_value(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Theoretical European option value.
///
/// # Parameters
/// * `spot` - Current underlying price S.
/// * `strike` - Exercise price K.
/// * `time` - Time to expiration in years.
/// * `rate` - Continuously compounded risk-free rate.
/// * `volatility` - Annualized implied volatility.
///
/// # Returns
/// Premium in underlying currency units. Collapses to intrinsic value when
/// `time <= 0` or `volatility <= 0`.
pub fn black_scholes(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    volatility: f64,
) -> f64 {
    if time <= 0.0 || volatility <= 0.0 {
        return intrinsic_value(option_type, spot, strike);
    }

    let (d1, d2) = d1_d2(spot, strike, time, rate, volatility);
    let discounted_strike = strike * (-rate * time).exp();
    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atm_call_magnitude() {
        // SPY at 500, 30 days, 18% vol: ATM call roughly 2% of spot.
        let price = black_scholes(OptionType::Call, 500.0, 500.0, 30.0 / 365.0, 0.045, 0.18);
        assert!(price > 8.0 && price < 15.0, "unexpected ATM premium: {price}");
    }

    #[test]
    fn test_put_call_parity() {
        // C - P = S - K*e^(-rT)
        let (spot, strike, time, rate, vol) = (500.0, 495.0, 60.0 / 365.0, 0.045, 0.2);
        let call = black_scholes(OptionType::Call, spot, strike, time, rate, vol);
        let put = black_scholes(OptionType::Put, spot, strike, time, rate, vol);
        let expected = spot - strike * (-rate * time).exp();
        assert!((call - put - expected).abs() < 1e-9, "parity violated");
    }

    #[test]
    fn test_expired_collapses_to_intrinsic() {
        assert_eq!(
            black_scholes(OptionType::Call, 510.0, 500.0, 0.0, 0.045, 0.2),
            10.0
        );
        assert_eq!(
            black_scholes(OptionType::Put, 510.0, 500.0, -0.01, 0.045, 0.2),
            0.0
        );
    }

    #[test]
    fn test_zero_vol_collapses_to_intrinsic() {
        assert_eq!(
            black_scholes(OptionType::Put, 480.0, 500.0, 0.25, 0.045, 0.0),
            20.0
        );
    }
}
