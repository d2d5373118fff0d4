//! End-to-end render pipeline tests over injected data sources.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use volterm_analytics::{StrategyLeg, StrategyPosition};
use volterm_connectors::{DataSourceArbiter, QuoteSource, SimulatedSource};
use volterm_core::{AnalyticsConfig, DataMode};
use volterm_models::{
    DataSource, OptionType, Quote, RawChain, RawExpiry, Ticker,
};
use volterm_terminal::RenderPipeline;

/// Injectable source whose chain payload and health are controlled per test.
struct ScriptedSource {
    healthy: bool,
    malformed_chain: Arc<AtomicBool>,
}

impl ScriptedSource {
    fn new(healthy: bool) -> Self {
        Self {
            healthy,
            malformed_chain: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn probe(&self) -> bool {
        self.healthy
    }

    async fn fetch_quote(&self, ticker: Ticker) -> anyhow::Result<Quote> {
        Ok(Quote::from_last(ticker, 500.0, Some(498.0)))
    }

    async fn fetch_chain(&self, ticker: Ticker) -> anyhow::Result<RawChain> {
        if self.malformed_chain.load(Ordering::SeqCst) {
            // A dated expiration with zero usable rows.
            let tomorrow = Utc::now().date_naive() + ChronoDuration::days(1);
            return Ok(RawChain {
                ticker: ticker.symbol().to_string(),
                spot: Some(500.0),
                expirations: vec![RawExpiry {
                    expiration: tomorrow.format("%Y-%m-%d").to_string(),
                    dte: Some(1),
                    calls: vec![],
                    puts: vec![],
                }],
            });
        }
        SimulatedSource::new().fetch_chain(ticker).await
    }
}

fn test_config() -> AnalyticsConfig {
    // The 30s probe TTL keeps health checks cached across a whole test.
    AnalyticsConfig::default()
}

fn demo_pipeline() -> RenderPipeline {
    let config = test_config();
    let arbiter = DataSourceArbiter::with_sources(
        &config,
        DataMode::Demo,
        None,
        Box::new(ScriptedSource::new(false)),
    );
    RenderPipeline::new(&config, arbiter)
}

#[tokio::test]
async fn test_demo_frame_is_complete_and_renderable() {
    let mut pipeline = demo_pipeline();
    let frame = pipeline.render(Ticker::Spy, None).await.unwrap();

    assert_eq!(frame.ticker, Ticker::Spy);
    assert_eq!(frame.quote_source, DataSource::Simulated);
    assert!(!frame.degraded, "demo mode is the baseline, not a fallback");
    assert_eq!(frame.quote.price, frame.surface.spot);

    // Six simulated expirations, trimmed to the four-expiration horizon.
    assert_eq!(frame.surface.expiries.len(), 4);
    assert_eq!(frame.surface.points.len(), 4 * 21);
    for point in &frame.surface.points {
        assert!((0.8..=1.2).contains(&point.moneyness));
        assert!(point.iv > 0.0);
    }

    // Tenors come out ordered shortest-first.
    let days: Vec<i64> = frame.term.iter().map(|p| p.tenor_days).collect();
    let mut sorted = days.clone();
    sorted.sort_unstable();
    assert!(!days.is_empty());
    assert_eq!(days, sorted);
}

#[tokio::test]
async fn test_frame_serializes_for_the_ui() {
    let mut pipeline = demo_pipeline();
    let frame = pipeline.render(Ticker::Qqq, None).await.unwrap();
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["ticker"], "QQQ");
    assert_eq!(json["mode"], "demo");
    assert!(json["surface"]["points"].as_array().unwrap().len() > 0);
}

#[tokio::test]
async fn test_remote_quota_covers_probe_and_quotes() {
    let config = test_config();
    let arbiter = DataSourceArbiter::with_sources(
        &config,
        DataMode::RemoteOnly,
        Some(Box::new(ScriptedSource::new(true))),
        Box::new(ScriptedSource::new(false)),
    );
    let mut pipeline = RenderPipeline::new(&config, arbiter);

    // The first pass probes remote health, which is itself a provider
    // request: one quota token goes to the probe, four remain for quotes.
    for i in 0..4 {
        let frame = pipeline.render(Ticker::Spy, None).await.unwrap();
        assert_eq!(frame.quote_source, DataSource::Remote, "render {} within quota", i + 1);
        assert!(!frame.degraded);
    }
    let fifth = pipeline.render(Ticker::Spy, None).await.unwrap();
    assert_eq!(fifth.quote_source, DataSource::Simulated);
    assert!(fifth.degraded);
    // Quota exhaustion alone never moves the mode.
    assert_eq!(pipeline.mode(), DataMode::RemoteOnly);
}

#[tokio::test]
async fn test_malformed_live_chain_degrades_and_refetches() {
    let config = test_config();
    let remote = ScriptedSource::new(true);
    let proxy = ScriptedSource::new(true);
    let malformed = proxy.malformed_chain.clone();
    let arbiter = DataSourceArbiter::with_sources(
        &config,
        DataMode::Hybrid,
        Some(Box::new(remote)),
        Box::new(proxy),
    );
    let mut pipeline = RenderPipeline::new(&config, arbiter);

    malformed.store(true, Ordering::SeqCst);
    let frame = pipeline.render(Ticker::Spy, None).await.unwrap();

    // The pass still completes, served from below and tagged degraded.
    assert_eq!(frame.chain_source, DataSource::Simulated);
    assert!(frame.degraded);
    assert!(pipeline.mode() < DataMode::Hybrid, "unusable payload costs a level");
    assert!(!frame.surface.expiries.is_empty());
}

#[tokio::test]
async fn test_stale_frame_is_dropped_on_apply() {
    let mut pipeline = demo_pipeline();

    let first = pipeline.render(Ticker::Spy, None).await.unwrap();
    let second = pipeline.render(Ticker::Qqq, None).await.unwrap();
    assert!(second.seq > first.seq);

    // The newer pass lands first; the older result arrives late and loses.
    let applied = pipeline.apply(second).unwrap();
    assert_eq!(applied.ticker, Ticker::Qqq);
    assert!(pipeline.apply(first).is_none());
}

#[tokio::test]
async fn test_strategy_rides_the_frame_surface() {
    let mut pipeline = demo_pipeline();
    let expiration = Utc::now().date_naive() + ChronoDuration::days(30);
    let position = StrategyPosition {
        legs: vec![
            StrategyLeg {
                option_type: OptionType::Call,
                strike: 500.0,
                expiration,
                quantity: 1,
                entry_price: 10.0,
            },
            StrategyLeg {
                option_type: OptionType::Put,
                strike: 500.0,
                expiration,
                quantity: 1,
                entry_price: 9.0,
            },
        ],
    };

    let frame = pipeline.render(Ticker::Spy, Some(&position)).await.unwrap();
    let analysis = frame.strategy.expect("position supplied, analysis expected");
    assert_eq!(analysis.curve.len(), 61);
    assert!(analysis.excluded.is_empty());
    // A straddle has offsetting deltas and strictly positive gamma.
    assert!(analysis.greeks.delta.abs() < 0.5);
    assert!(analysis.greeks.gamma > 0.0);
}
