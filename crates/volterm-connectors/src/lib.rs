//! # Volterm Data Connectors
//!
//! Quote-source adapters and the data-mode arbiter.
//!
//! ## Description
//! Implements the unified [`QuoteSource`] abstraction over the three data
//! tiers (simulated, remote quote API, local proxy). Following the Adapter
//! pattern, each source deserializes its own wire format into the shared
//! raw payload types, so the analytics pipeline never sees provider JSON.
//! The [`DataSourceArbiter`] decides which tier answers each request,
//! enforcing the remote quota and degrading one level per failure.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod arbiter;
pub mod proxy;
pub mod remote;
pub mod simulated;
pub mod source;

pub use arbiter::DataSourceArbiter;
pub use proxy::ProxySource;
pub use remote::RemoteSource;
pub use simulated::SimulatedSource;
pub use source::QuoteSource;
