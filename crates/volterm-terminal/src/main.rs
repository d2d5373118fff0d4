//! # Volterm Terminal CLI
//!
//! Runs one render pass and prints the chart-ready frame as JSON.
//!
//! ## Description
//! Entry point for headless use and smoke testing. Starts in demo mode,
//! upgrades through the probe path when an API key or proxy is reachable,
//! and always produces a frame as long as the simulated tier works.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use chrono::{Duration, Utc};
use clap::Parser;
use tracing::info;
use volterm_analytics::{black_scholes, StrategyLeg, StrategyPosition};
use volterm_connectors::{proxy::DEFAULT_PROXY_URL, DataSourceArbiter, SimulatedSource};
use volterm_core::AnalyticsConfig;
use volterm_models::{OptionType, Ticker};
use volterm_terminal::RenderPipeline;

/// Volterm derivatives terminal, single-pass CLI.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Ticker to render (SPY, SPX, QQQ, IWM, VIX, ES)
    #[arg(short, long, default_value = "SPY")]
    ticker: String,

    /// Remote quote API key; omit to stay on simulated/proxy tiers
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL of the local market-data proxy
    #[arg(long, default_value = DEFAULT_PROXY_URL)]
    proxy_url: String,

    /// Evaluate a demo ATM straddle alongside the surface
    #[arg(long, default_value = "false")]
    straddle: bool,
}

/// An ATM straddle roughly one month out, priced off the simulated level.
fn demo_straddle(ticker: Ticker, config: &AnalyticsConfig) -> StrategyPosition {
    let spot = SimulatedSource::base_price(ticker);
    let strike = spot.round();
    let expiration = Utc::now().date_naive() + Duration::days(30);
    let time = 30.0 / 365.0;
    let legs = [OptionType::Call, OptionType::Put]
        .into_iter()
        .map(|option_type| StrategyLeg {
            option_type,
            strike,
            expiration,
            quantity: 1,
            entry_price: black_scholes(option_type, spot, strike, time, config.risk_free_rate, 0.20),
        })
        .collect();
    StrategyPosition { legs }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let ticker: Ticker = args.ticker.parse()?;
    let config = AnalyticsConfig::default();

    let arbiter = DataSourceArbiter::with_proxy_url(&config, &args.proxy_url)?;
    let mut pipeline = RenderPipeline::new(&config, arbiter);
    if let Some(key) = args.api_key {
        pipeline.set_api_key(key).await?;
    }
    info!("starting in {} mode", pipeline.mode());

    let position = args.straddle.then(|| demo_straddle(ticker, &config));
    let frame = pipeline.render(ticker, position.as_ref()).await?;
    let frame = pipeline
        .apply(frame)
        .expect("single pass cannot be superseded");

    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}
