//! # Local Proxy Server
//!
//! Serves the simulated tier over the proxy's REST surface.
//!
//! ## Description
//! Stands in for the real market-data proxy during local development: same
//! routes, same wire format, backed by the deterministic simulated source
//! instead of a market-data library. Useful for exercising the hybrid data
//! path end to end without network access.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use volterm_analytics::{ChainAssembler, IvSurfaceBuilder, TermStructureMapper};
use volterm_connectors::{QuoteSource, SimulatedSource};
use volterm_core::AnalyticsConfig;
use volterm_models::Ticker;

/// Local development proxy serving simulated market data.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,
}

struct ProxyState {
    source: SimulatedSource,
    config: AnalyticsConfig,
}

type HandlerError = (StatusCode, Json<serde_json::Value>);

fn bad_ticker(symbol: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("unknown ticker {symbol}") })),
    )
}

fn upstream_error(e: anyhow::Error) -> HandlerError {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "error": format!("{e:#}") })),
    )
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn quote_handler(
    State(state): State<Arc<ProxyState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let ticker: Ticker = symbol.parse().map_err(|_| bad_ticker(&symbol))?;
    let quote = state
        .source
        .fetch_quote(ticker)
        .await
        .map_err(upstream_error)?;
    Ok(Json(serde_json::json!({
        "ticker": ticker.symbol(),
        "price": quote.price,
        "previous_close": quote.previous_close,
        "change": quote.change,
        "source": "simulated",
    })))
}

async fn options_handler(
    State(state): State<Arc<ProxyState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let ticker: Ticker = symbol.parse().map_err(|_| bad_ticker(&symbol))?;
    let mut chain = state
        .source
        .fetch_chain(ticker)
        .await
        .map_err(upstream_error)?;
    // The real proxy serves only the nearest four expirations.
    chain
        .expirations
        .truncate(state.config.chain_horizon);
    Ok(Json(chain))
}

async fn iv_surface_handler(
    State(state): State<Arc<ProxyState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let ticker: Ticker = symbol.parse().map_err(|_| bad_ticker(&symbol))?;
    let raw = state
        .source
        .fetch_chain(ticker)
        .await
        .map_err(upstream_error)?;
    let spot = raw.spot.unwrap_or_else(|| SimulatedSource::base_price(ticker));
    let chain = ChainAssembler::new(&state.config)
        .assemble(&raw, ticker, spot, Utc::now().date_naive())
        .map_err(|e| upstream_error(e.into()))?;
    Ok(Json(IvSurfaceBuilder::new(&state.config).build(&chain)))
}

async fn term_structure_handler(
    State(state): State<Arc<ProxyState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let ticker: Ticker = symbol.parse().map_err(|_| bad_ticker(&symbol))?;
    let raw = state
        .source
        .fetch_chain(ticker)
        .await
        .map_err(upstream_error)?;
    let spot = raw.spot.unwrap_or_else(|| SimulatedSource::base_price(ticker));
    let chain = ChainAssembler::new(&state.config)
        .assemble(&raw, ticker, spot, Utc::now().date_naive())
        .map_err(|e| upstream_error(e.into()))?;
    Ok(Json(TermStructureMapper::new(&state.config).map(&chain)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let state = Arc::new(ProxyState {
        source: SimulatedSource::new(),
        config: AnalyticsConfig::default(),
    });

    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/quote/:ticker", get(quote_handler))
        .route("/api/options/:ticker", get(options_handler))
        .route("/api/iv-surface/:ticker", get(iv_surface_handler))
        .route("/api/term-structure/:ticker", get(term_structure_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("proxy listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
