//! # Ticker Universe Module
//!
//! Fixed lookup table of supported underlyings and their provider symbols.
//!
//! ## Description
//! The terminal serves a closed set of index, ETF, volatility, and futures
//! underlyings. Each entry maps the display symbol to the identifier that
//! the market-data provider understands (e.g., SPX trades options but the
//! provider quotes the cash index as `^GSPC`).
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instrument classification of the underlying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// Exchange-traded fund.
    Etf,
    /// Cash equity index.
    Index,
    /// Volatility index (no tradeable underlying).
    VolatilityIndex,
    /// Futures contract.
    Future,
}

/// A supported underlying symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ticker {
    Spy,
    Spx,
    Qqq,
    Iwm,
    Vix,
    Es,
}

impl Ticker {
    /// Every symbol the terminal serves, in display order.
    pub const ALL: [Ticker; 6] = [
        Ticker::Spy,
        Ticker::Spx,
        Ticker::Qqq,
        Ticker::Iwm,
        Ticker::Vix,
        Ticker::Es,
    ];

    /// Display symbol as shown in the terminal.
    pub fn symbol(&self) -> &'static str {
        match self {
            Ticker::Spy => "SPY",
            Ticker::Spx => "SPX",
            Ticker::Qqq => "QQQ",
            Ticker::Iwm => "IWM",
            Ticker::Vix => "VIX",
            Ticker::Es => "ES",
        }
    }

    /// Identifier understood by the market-data provider.
    pub fn provider_symbol(&self) -> &'static str {
        match self {
            Ticker::Spx => "^GSPC",
            Ticker::Vix => "^VIX",
            Ticker::Es => "ES=F",
            other => other.symbol(),
        }
    }

    /// Instrument classification of the underlying.
    pub fn kind(&self) -> InstrumentKind {
        match self {
            Ticker::Spy | Ticker::Qqq | Ticker::Iwm => InstrumentKind::Etf,
            Ticker::Spx => InstrumentKind::Index,
            Ticker::Vix => InstrumentKind::VolatilityIndex,
            Ticker::Es => InstrumentKind::Future,
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when a symbol is outside the supported universe.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported ticker: {0}")]
pub struct UnknownTicker(pub String);

impl FromStr for Ticker {
    type Err = UnknownTicker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPY" => Ok(Ticker::Spy),
            "SPX" => Ok(Ticker::Spx),
            "QQQ" => Ok(Ticker::Qqq),
            "IWM" => Ok(Ticker::Iwm),
            "VIX" => Ok(Ticker::Vix),
            "ES" => Ok(Ticker::Es),
            other => Err(UnknownTicker(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_mapping() {
        assert_eq!(Ticker::Spx.provider_symbol(), "^GSPC");
        assert_eq!(Ticker::Vix.provider_symbol(), "^VIX");
        assert_eq!(Ticker::Es.provider_symbol(), "ES=F");
        assert_eq!(Ticker::Spy.provider_symbol(), "SPY");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("spy".parse::<Ticker>().unwrap(), Ticker::Spy);
        assert_eq!("Vix".parse::<Ticker>().unwrap(), Ticker::Vix);
        assert!("TSLA".parse::<Ticker>().is_err());
    }
}
