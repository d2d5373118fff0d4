//! # Local Proxy Module
//!
//! HTTP adapter over the local market-data proxy.
//!
//! ## Description
//! The proxy wraps a market-data library behind a small REST surface
//! (`/api/health`, `/api/quote/{ticker}`, `/api/options/{ticker}`). Chains
//! come back already limited to the nearest four expirations. A request
//! timeout or non-2xx response is a source failure; the arbiter degrades
//! one level and falls back.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use crate::source::QuoteSource;
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use volterm_models::{Quote, RawChain, Ticker};

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:5000";

/// `/api/health` response; `status` must carry the fixed success marker.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// `/api/quote/{ticker}` response. Numeric fields are plain decimals.
#[derive(Debug, Deserialize)]
struct ProxyQuote {
    price: Option<f64>,
    #[serde(default)]
    previous_close: Option<f64>,
}

/// HTTP adapter over the local proxy.
pub struct ProxySource {
    client: reqwest::Client,
    base_url: String,
}

impl ProxySource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building proxy http client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl QuoteSource for ProxySource {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn probe(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<HealthResponse>().await {
                    Ok(health) => health.status == "ok",
                    Err(e) => {
                        debug!("proxy health body unreadable: {e:#}");
                        false
                    }
                }
            }
            Ok(response) => {
                debug!("proxy health returned {}", response.status());
                false
            }
            Err(e) => {
                debug!("proxy unreachable: {e:#}");
                false
            }
        }
    }

    async fn fetch_quote(&self, ticker: Ticker) -> anyhow::Result<Quote> {
        let url = format!("{}/api/quote/{}", self.base_url, ticker.symbol());
        let raw: ProxyQuote = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let Some(price) = raw.price.filter(|p| *p > 0.0) else {
            bail!("proxy returned no price for {ticker}");
        };
        Ok(Quote::from_last(ticker, price, raw.previous_close))
    }

    async fn fetch_chain(&self, ticker: Ticker) -> anyhow::Result<RawChain> {
        let url = format!("{}/api/options/{}", self.base_url, ticker.symbol());
        let chain: RawChain = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if chain.expirations.is_empty() {
            bail!("proxy returned an empty chain for {ticker}");
        }
        Ok(chain)
    }
}
