//! # Raw Chain Payload Module
//!
//! Provider-shaped option-chain payload, prior to normalization.
//!
//! ## Description
//! Every `QuoteSource` adapter deserializes its provider response into this
//! one shape, so the analytics pipeline never sees provider-specific JSON.
//! Field names follow the local proxy's wire format (camelCase, as emitted
//! by the original backend); all numeric fields are optional because real
//! chains carry NaN-laden rows that the proxy zeroes out or omits.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use serde::{Deserialize, Serialize};

/// One raw contract row as the provider delivers it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContract {
    pub strike: Option<f64>,
    #[serde(rename = "lastPrice")]
    pub last_price: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub volume: Option<f64>,
    #[serde(rename = "openInterest")]
    pub open_interest: Option<f64>,
    #[serde(rename = "impliedVolatility")]
    pub implied_volatility: Option<f64>,
}

/// All raw contracts sharing one expiration date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawExpiry {
    /// ISO date string (`YYYY-MM-DD`), exactly as the provider sends it.
    pub expiration: String,
    /// Days to expiration, when precomputed by the provider.
    #[serde(default)]
    pub dte: Option<i64>,
    #[serde(default)]
    pub calls: Vec<RawContract>,
    #[serde(default)]
    pub puts: Vec<RawContract>,
}

/// Full raw chain response for one underlying.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawChain {
    pub ticker: String,
    /// Spot price, when the provider includes it in the chain response.
    #[serde(default)]
    pub spot: Option<f64>,
    #[serde(rename = "chains", default)]
    pub expirations: Vec<RawExpiry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_wire_shape() {
        // Shape matches the local proxy's /api/options response.
        let json = r#"{
            "ticker": "SPY",
            "expirations": ["2026-09-18"],
            "chains": [{
                "expiration": "2026-09-18",
                "dte": 24,
                "calls": [{"strike": 500.0, "lastPrice": 12.3, "bid": 12.1,
                           "ask": 12.5, "volume": 1500, "openInterest": 8200,
                           "impliedVolatility": 0.182}],
                "puts": []
            }],
            "source": "yfinance"
        }"#;

        let chain: RawChain = serde_json::from_str(json).unwrap();
        assert_eq!(chain.expirations.len(), 1);
        let c = &chain.expirations[0].calls[0];
        assert_eq!(c.strike, Some(500.0));
        assert_eq!(c.open_interest, Some(8200.0));
        assert!((c.implied_volatility.unwrap() - 0.182).abs() < 1e-12);
    }

    #[test]
    fn test_missing_fields_default() {
        let chain: RawChain = serde_json::from_str(r#"{"ticker": "QQQ"}"#).unwrap();
        assert!(chain.expirations.is_empty());
        assert!(chain.spot.is_none());
    }
}
