//! # Volterm Terminal
//!
//! Orchestration layer: the render pipeline behind the dashboard.
//!
//! ## Description
//! Wires the arbiter and the analytics engine into single render passes
//! and arbitrates supersession between rapid successive passes. The `volterm`
//! binary drives one pass from the command line; the `volterm-proxy` binary
//! serves the simulated tier over the proxy's REST surface for local
//! development.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod pipeline;

pub use pipeline::{Frame, RenderPipeline};
