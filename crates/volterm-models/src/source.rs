//! # Data Source Tagging Module
//!
//! Identifies which source actually answered a request.
//!
//! ## Description
//! Every payload handed to the renderer carries the effective source and a
//! degraded flag, so the UI can badge simulated or fallback data instead of
//! showing an error screen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The source that produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Deterministic in-process generator.
    Simulated,
    /// Third-party quote API (key-gated, rate-limited).
    Remote,
    /// Local proxy over the market-data library.
    Proxy,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Simulated => write!(f, "simulated"),
            DataSource::Remote => write!(f, "remote"),
            DataSource::Proxy => write!(f, "proxy"),
        }
    }
}

/// A payload tagged with its effective source.
///
/// `degraded` is set when a higher-tier source should have answered but the
/// arbiter fell back after a failure or rate limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
    pub degraded: bool,
}

impl<T> Sourced<T> {
    /// Payload served by its intended source.
    pub fn live(data: T, source: DataSource) -> Self {
        Self {
            data,
            source,
            degraded: false,
        }
    }

    /// Payload served by a fallback source after a degrade step.
    pub fn fallback(data: T, source: DataSource) -> Self {
        Self {
            data,
            source,
            degraded: true,
        }
    }

    /// Maps the payload while keeping the source tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            source: self.source,
            degraded: self.degraded,
        }
    }
}
