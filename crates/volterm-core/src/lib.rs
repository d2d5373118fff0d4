//! # Volterm Core
//!
//! Ambient concerns shared by the data and analytics layers.
//!
//! ## Description
//! Holds the data-mode state machine that governs source arbitration, the
//! single configuration table for every tenor/moneyness constant, the token
//! bucket guarding the remote provider's free-tier quota, and the error
//! taxonomy that the degrade paths report.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod config;
pub mod error;
pub mod mode;
pub mod rate_limit;

pub use config::{AnalyticsConfig, TenorBucket};
pub use error::DataError;
pub use mode::DataMode;
pub use rate_limit::RateLimiter;
