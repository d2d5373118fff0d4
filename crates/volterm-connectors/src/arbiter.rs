//! # Data Source Arbiter Module
//!
//! Decides which tier answers each request and tracks source health.
//!
//! ## Description
//! Owns the `DataMode` value and transitions it via pure one-step
//! functions: successful probes earn an upgrade, any probe or in-flight
//! failure costs exactly one level. Probe results are cached for a short
//! TTL; an in-flight failure counts as a failed probe and holds the lower
//! mode for a full window. Remote probes are themselves provider requests
//! and draw from the same quota as quotes; a probe with no token to spend
//! is skipped and the mode holds. Dispatch follows
//! the mode: quotes go remote when allowed and the rate limiter permits,
//! chains go to the proxy only in hybrid mode, and everything else falls
//! back to the simulated tier. The caller always receives data, tagged
//! with its effective source.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use crate::proxy::{ProxySource, DEFAULT_PROXY_URL};
use crate::remote::RemoteSource;
use crate::simulated::SimulatedSource;
use crate::source::QuoteSource;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use volterm_core::{AnalyticsConfig, DataMode, RateLimiter};
use volterm_models::{DataSource, Quote, RawChain, Sourced, Ticker};

/// Chooses a data tier per request and degrades gracefully on failure.
pub struct DataSourceArbiter {
    mode: DataMode,
    simulated: SimulatedSource,
    remote: Option<Box<dyn QuoteSource>>,
    proxy: Box<dyn QuoteSource>,
    limiter: RateLimiter,
    probe_ttl: Duration,
    probed_at: Option<Instant>,
    fetch_timeout: Duration,
}

impl DataSourceArbiter {
    /// Starts in demo mode against the default local proxy address.
    pub fn new(config: &AnalyticsConfig) -> anyhow::Result<Self> {
        Self::with_proxy_url(config, DEFAULT_PROXY_URL)
    }

    /// Starts in demo mode against a specific proxy address.
    pub fn with_proxy_url(config: &AnalyticsConfig, proxy_url: &str) -> anyhow::Result<Self> {
        let proxy = ProxySource::new(proxy_url, config.fetch_timeout)?;
        Ok(Self::with_sources(config, DataMode::Demo, None, Box::new(proxy)))
    }

    /// Fully injected constructor for tests and alternate adapters.
    pub fn with_sources(
        config: &AnalyticsConfig,
        mode: DataMode,
        remote: Option<Box<dyn QuoteSource>>,
        proxy: Box<dyn QuoteSource>,
    ) -> Self {
        Self {
            mode,
            simulated: SimulatedSource::new(),
            remote,
            proxy,
            limiter: RateLimiter::new("remote-quotes", config.remote_quota, config.remote_window),
            probe_ttl: config.probe_ttl,
            probed_at: None,
            fetch_timeout: config.fetch_timeout,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Installs the user-supplied API key and probes immediately.
    ///
    /// The key is held only by the remote client; it is never sent to the
    /// local proxy.
    pub async fn set_api_key(&mut self, api_key: String) -> anyhow::Result<()> {
        self.remote = Some(Box::new(RemoteSource::new(api_key, self.fetch_timeout)?));
        self.probed_at = None;
        self.refresh_mode().await;
        Ok(())
    }

    /// Re-probes source health if the cached result has expired, moving
    /// the mode at most one level in either direction.
    pub async fn refresh_mode(&mut self) {
        if let Some(t) = self.probed_at {
            if t.elapsed() < self.probe_ttl {
                return;
            }
        }

        let next = match self.mode {
            DataMode::Demo => match self.probe_remote().await {
                Some(true) => self.mode.upgrade(),
                _ => self.mode,
            },
            DataMode::RemoteOnly => {
                if self.remote.is_none() {
                    self.mode.downgrade()
                } else {
                    match self.probe_remote().await {
                        Some(false) => self.mode.downgrade(),
                        Some(true) => {
                            if self.proxy.probe().await {
                                self.mode.upgrade()
                            } else {
                                self.mode
                            }
                        }
                        // No quota token for the probe: inconclusive, hold.
                        None => self.mode,
                    }
                }
            }
            DataMode::Hybrid => {
                if self.proxy.probe().await {
                    self.mode
                } else {
                    self.mode.downgrade()
                }
            }
        };

        if next != self.mode {
            info!("data mode {} -> {}", self.mode, next);
        }
        self.mode = next;
        self.probed_at = Some(Instant::now());
    }

    /// Probes the remote tier's health.
    ///
    /// The probe is a real provider request, so it spends a quota token
    /// like any other quote. Returns `None` when no client is installed or
    /// the quota has no token to spend.
    async fn probe_remote(&mut self) -> Option<bool> {
        if self.remote.is_none() {
            return None;
        }
        if !self.limiter.try_acquire() {
            debug!("skipping remote probe: no quota token");
            return None;
        }
        Some(self.remote.as_ref()?.probe().await)
    }

    /// Records a hard failure of an in-flight request: one step down.
    ///
    /// The failure counts as a fresh probe result, so the downgraded mode
    /// holds until the next probe window instead of being re-upgraded by
    /// a health check within the same pass.
    pub fn note_failure(&mut self, source: &'static str) {
        let next = self.mode.downgrade();
        warn!("{source} failed in flight: degrading {} -> {}", self.mode, next);
        metrics::counter!("volterm_source_degrades_total", "source" => source).increment(1);
        self.mode = next;
        self.probed_at = Some(Instant::now());
    }

    /// Fetches a quote from the best tier the mode and quota allow.
    ///
    /// Never fails while the simulated tier works; a rate-limited or
    /// failed remote request is served simulated and tagged degraded.
    pub async fn quote(&mut self, ticker: Ticker) -> anyhow::Result<Sourced<Quote>> {
        self.refresh_mode().await;

        if self.mode.remote_allowed() {
            if let Some(remote) = &self.remote {
                if self.limiter.try_acquire() {
                    match remote.fetch_quote(ticker).await {
                        Ok(quote) => return Ok(Sourced::live(quote, DataSource::Remote)),
                        Err(e) => {
                            warn!("remote quote for {ticker} failed: {e:#}");
                            self.note_failure("remote");
                        }
                    }
                } else {
                    debug!("remote quota exhausted; serving {ticker} simulated");
                }
            }
            let quote = self.simulated.fetch_quote(ticker).await?;
            return Ok(Sourced::fallback(quote, DataSource::Simulated));
        }

        let quote = self.simulated.fetch_quote(ticker).await?;
        Ok(Sourced::live(quote, DataSource::Simulated))
    }

    /// Fetches a raw chain: proxy in hybrid mode, simulated otherwise.
    pub async fn chain(&mut self, ticker: Ticker) -> anyhow::Result<Sourced<RawChain>> {
        self.refresh_mode().await;

        if self.mode.proxy_allowed() {
            match self.proxy.fetch_chain(ticker).await {
                Ok(chain) => return Ok(Sourced::live(chain, DataSource::Proxy)),
                Err(e) => {
                    warn!("proxy chain for {ticker} failed: {e:#}");
                    self.note_failure("proxy");
                }
            }
            let chain = self.simulated.fetch_chain(ticker).await?;
            return Ok(Sourced::fallback(chain, DataSource::Simulated));
        }

        let chain = self.simulated.fetch_chain(ticker).await?;
        Ok(Sourced::live(chain, DataSource::Simulated))
    }
}
