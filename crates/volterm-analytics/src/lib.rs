//! # Volterm Analytics Engine
//!
//! Option-chain normalization, IV surface, term structure, and strategy P&L.
//!
//! ## Description
//! Everything here is synchronous, non-suspending, and bounded: small fixed
//! grids computed from one normalized `OptionChain`. The assembler is the
//! only entry point from raw provider payloads; downstream builders never
//! see provider-specific shapes.
//!
//! ### Core Subsystems
//! - **Pricing & Greeks**: Black-Scholes valuation and sensitivities
//!   (Delta, Gamma, Theta, Vega) with intrinsic-value collapse at expiry.
//! - **Chain Assembly**: Horizon trimming, numeric coercion, and
//!   strike-uniqueness enforcement over raw chains.
//! - **IV Surface**: Moneyness x tenor grid with gap interpolation.
//! - **Term Structure**: ATM IV mapped onto the standard tenor set.
//! - **Strategy Engine**: Per-leg and aggregate Greeks plus a P&L curve for
//!   multi-leg positions.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions
//! - Black, F., & Scholes, M. (1973). The Pricing of Options and Corporate Liabilities.

pub mod chain;
pub mod greeks;
pub mod pricing;
pub mod strategy;
pub mod surface;
pub mod term;

pub use chain::ChainAssembler;
pub use greeks::OptionGreeks;
pub use pricing::{black_scholes, intrinsic_value};
pub use strategy::{PnlPoint, StrategyAnalysis, StrategyEngine, StrategyLeg, StrategyPosition};
pub use surface::{IvSurface, IvSurfaceBuilder, IvSurfacePoint};
pub use term::{TermStructureMapper, TermStructurePoint};
