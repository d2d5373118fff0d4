//! # Remote Quote API Module
//!
//! Key-gated HTTP adapter for the third-party quote provider.
//!
//! ## Description
//! Serves quotes only; the provider's free tier has no chain endpoint, so
//! `fetch_chain` errors by contract and the arbiter never routes chains
//! here. The caller is responsible for consulting the rate limiter before
//! each request. The API key lives only in this client and is sent solely
//! to the provider, never to the local proxy.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use crate::source::QuoteSource;
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use volterm_models::{Quote, RawChain, Ticker};

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Raw quote response from the provider.
#[derive(Debug, Deserialize)]
struct RemoteQuote {
    /// Current price.
    c: f64,
    /// Previous close.
    #[serde(default)]
    pc: Option<f64>,
}

/// HTTP adapter over the remote quote API.
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RemoteSource {
    /// Builds a client with the user-supplied key and request timeout.
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building remote http client")?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Points the client at a different endpoint (tests, self-hosting).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_quote(&self, ticker: Ticker) -> anyhow::Result<RemoteQuote> {
        let url = format!("{}/quote", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", ticker.provider_symbol()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuoteSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn probe(&self) -> bool {
        // One lightweight quote doubles as the reachability check.
        match self.get_quote(Ticker::Spy).await {
            Ok(q) if q.c > 0.0 => {
                info!("remote quote API reachable");
                true
            }
            Ok(_) => {
                debug!("remote probe returned empty quote");
                false
            }
            Err(e) => {
                debug!("remote probe failed: {e:#}");
                false
            }
        }
    }

    async fn fetch_quote(&self, ticker: Ticker) -> anyhow::Result<Quote> {
        let raw = self.get_quote(ticker).await?;
        if raw.c <= 0.0 {
            bail!("remote returned no data for {ticker}");
        }
        Ok(Quote::from_last(ticker, raw.c, raw.pc.filter(|pc| *pc > 0.0)))
    }

    async fn fetch_chain(&self, _ticker: Ticker) -> anyhow::Result<RawChain> {
        bail!("remote quote API does not serve option chains")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let raw: RemoteQuote = serde_json::from_str(r#"{"c": 502.5, "d": 2.1, "dp": 0.42, "pc": 500.4, "t": 1756100000}"#).unwrap();
        assert!((raw.c - 502.5).abs() < 1e-12);
        assert_eq!(raw.pc, Some(500.4));
    }

    #[tokio::test]
    async fn test_chain_unsupported() {
        let source = RemoteSource::new("demo".into(), Duration::from_secs(1)).unwrap();
        assert!(source.fetch_chain(Ticker::Spy).await.is_err());
    }
}
