//! # Volterm Data Models
//!
//! Canonical data types shared by every layer of the terminal.
//!
//! ## Description
//! This crate is the bottom of the dependency stack (models → core →
//! connectors/analytics → terminal). It defines the supported ticker
//! universe, quote snapshots, the provider-shaped raw option-chain
//! payload, and the normalized `OptionChain` that the analytics
//! pipeline consumes. Nothing here performs I/O.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod chain;
pub mod quote;
pub mod raw;
pub mod source;
pub mod ticker;

pub use chain::{ExpirySlice, OptionChain, OptionContract, OptionType};
pub use quote::Quote;
pub use raw::{RawChain, RawContract, RawExpiry};
pub use source::{DataSource, Sourced};
pub use ticker::{InstrumentKind, Ticker};
