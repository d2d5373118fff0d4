//! # Render Pipeline Module
//!
//! One fetch→assemble→derive pass producing a chart-ready frame.
//!
//! ## Description
//! A render pass fetches the quote and raw chain through the arbiter,
//! normalizes the chain, and derives the IV surface, term structure, and
//! optional strategy analysis. Passes are tagged with a monotonically
//! increasing sequence number; `apply` drops any frame that resolves after
//! a newer pass has already been applied, so rapid ticker switching never
//! renders stale data. An unusable chain payload degrades the arbiter one
//! level and the pass refetches from the tier below; only a failure of the
//! simulated tier aborts the pass.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};
use volterm_analytics::{
    ChainAssembler, IvSurface, IvSurfaceBuilder, StrategyAnalysis, StrategyEngine,
    StrategyPosition, TermStructureMapper, TermStructurePoint,
};
use volterm_connectors::DataSourceArbiter;
use volterm_core::{AnalyticsConfig, DataMode};
use volterm_models::{DataSource, OptionChain, Quote, Ticker};

/// Everything one render pass hands to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Sequence number of the pass that produced this frame.
    pub seq: u64,
    pub ticker: Ticker,
    /// Data mode after the pass completed.
    pub mode: DataMode,
    pub quote: Quote,
    pub quote_source: DataSource,
    pub chain_source: DataSource,
    /// True when any part of the frame was served by a fallback tier.
    pub degraded: bool,
    pub surface: IvSurface,
    pub term: Vec<TermStructurePoint>,
    pub strategy: Option<StrategyAnalysis>,
}

/// Runs render passes and arbitrates supersession between them.
pub struct RenderPipeline {
    arbiter: DataSourceArbiter,
    assembler: ChainAssembler,
    surface: IvSurfaceBuilder,
    term: TermStructureMapper,
    strategy: StrategyEngine,
    /// Last sequence number issued to a pass.
    next_seq: AtomicU64,
    /// Highest sequence number applied so far.
    applied: AtomicU64,
}

impl RenderPipeline {
    pub fn new(config: &AnalyticsConfig, arbiter: DataSourceArbiter) -> Self {
        Self {
            arbiter,
            assembler: ChainAssembler::new(config),
            surface: IvSurfaceBuilder::new(config),
            term: TermStructureMapper::new(config),
            strategy: StrategyEngine::new(config),
            next_seq: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub fn mode(&self) -> DataMode {
        self.arbiter.mode()
    }

    /// Installs an API key on the underlying arbiter.
    pub async fn set_api_key(&mut self, api_key: String) -> anyhow::Result<()> {
        self.arbiter.set_api_key(api_key).await
    }

    /// Runs one full pass for `ticker` and returns its frame.
    ///
    /// The frame still has to go through [`apply`](Self::apply); a pass
    /// started later may have finished first and superseded this one.
    ///
    /// # Errors
    /// Only when even the simulated tier cannot produce a usable chain,
    /// which is a fatal configuration error rather than a data outage.
    pub async fn render(
        &mut self,
        ticker: Ticker,
        position: Option<&StrategyPosition>,
    ) -> anyhow::Result<Frame> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let today = Utc::now().date_naive();

        let quote = self.arbiter.quote(ticker).await?;
        let (chain, chain_source, chain_degraded) =
            self.assembled_chain(ticker, quote.data.price, today).await?;

        let surface = self.surface.build(&chain);
        let term = self.term.map(&chain);
        let strategy = position.map(|p| {
            self.strategy
                .evaluate(p, quote.data.price, today, Some(&surface))
        });

        info!(
            "pass {seq}: {ticker} via {}/{} ({} expirations, {} tenors)",
            quote.source,
            chain_source,
            surface.expiries.len(),
            term.len(),
        );

        Ok(Frame {
            seq,
            ticker,
            mode: self.arbiter.mode(),
            degraded: quote.degraded || chain_degraded,
            quote_source: quote.source,
            quote: quote.data,
            chain_source,
            surface,
            term,
            strategy,
        })
    }

    /// Fetches and normalizes a chain, degrading and refetching once if
    /// the live payload is unusable.
    async fn assembled_chain(
        &mut self,
        ticker: Ticker,
        spot: f64,
        today: chrono::NaiveDate,
    ) -> anyhow::Result<(OptionChain, DataSource, bool)> {
        let raw = self.arbiter.chain(ticker).await?;
        match self.assembler.assemble(&raw.data, ticker, spot, today) {
            Ok(chain) => Ok((chain, raw.source, raw.degraded)),
            Err(e) if e.triggers_degrade() && raw.source != DataSource::Simulated => {
                warn!("{} chain for {ticker} unusable ({e}); refetching below", raw.source);
                self.arbiter.note_failure("chain");
                let retry = self.arbiter.chain(ticker).await?;
                let chain = self
                    .assembler
                    .assemble(&retry.data, ticker, spot, today)
                    .context("fallback chain unusable")?;
                Ok((chain, retry.source, true))
            }
            // The simulated tier produced nothing usable: fatal.
            Err(e) => Err(e).context("simulated chain unusable"),
        }
    }

    /// Applies a finished frame unless a newer pass has superseded it.
    ///
    /// Returns the frame for rendering, or `None` when it arrived stale.
    pub fn apply(&self, frame: Frame) -> Option<Frame> {
        let prev = self.applied.fetch_max(frame.seq, Ordering::SeqCst);
        if frame.seq < prev {
            info!("dropping stale frame {} (newest applied: {prev})", frame.seq);
            return None;
        }
        Some(frame)
    }
}
