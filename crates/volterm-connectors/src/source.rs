//! # Quote Source Interface Module
//!
//! Unified abstraction over the terminal's three data tiers.
//!
//! ## Description
//! Each adapter fetches raw quotes and chains for a ticker and answers a
//! lightweight health probe. Fetches are the pipeline's only suspension
//! points; a timeout inside an adapter surfaces as an `Err`, which the
//! arbiter treats as a source failure.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use async_trait::async_trait;
use volterm_models::{Quote, RawChain, Ticker};

/// Unified interface for the Simulated, Remote, and Proxy data tiers.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Human-readable tier name for logging.
    fn name(&self) -> &'static str;

    /// Lightweight reachability probe. Never errors; unreachable is `false`.
    async fn probe(&self) -> bool;

    /// Fetches the latest quote for `ticker`.
    async fn fetch_quote(&self, ticker: Ticker) -> anyhow::Result<Quote>;

    /// Fetches the raw option chain for `ticker`.
    ///
    /// Not every tier serves chains; the remote quote API returns an error
    /// here by contract and the arbiter never routes chains to it.
    async fn fetch_chain(&self, ticker: Ticker) -> anyhow::Result<RawChain>;
}
