//! # Error Taxonomy Module
//!
//! Failure classification for the data and analytics pipeline.
//!
//! ## Description
//! Source-level failures (`RateLimited`, `SourceUnreachable`,
//! `MalformedChain`) are recovered by the arbiter's degrade path and never
//! abort a rendering pass. Analytics-level failures (`InvalidLeg`,
//! `InterpolationGap`) exclude the offending leg or expiration and are
//! reported alongside the result.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use chrono::NaiveDate;
use serde::Serialize;

/// Pipeline failure classification.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
pub enum DataError {
    /// Remote quota exhausted; caller must wait or fall back.
    #[error("remote quote quota exhausted")]
    RateLimited,

    /// Network failure or timeout; triggers a one-step degrade.
    #[error("{source_name} source unreachable: {reason}")]
    SourceUnreachable {
        source_name: &'static str,
        reason: String,
    },

    /// Payload had zero usable contracts; triggers a degrade-to-simulated.
    #[error("option chain unusable: {0}")]
    MalformedChain(String),

    /// Strategy leg rejected; rest of the position is still computed.
    #[error("strategy leg {index} rejected: {reason}")]
    InvalidLeg { index: usize, reason: String },

    /// Expiration lacked enough populated buckets for the surface.
    #[error("expiration {expiration} excluded: fewer than 2 populated buckets")]
    InterpolationGap { expiration: NaiveDate },
}

impl DataError {
    /// Whether the arbiter should step the data mode down on this error.
    pub fn triggers_degrade(&self) -> bool {
        matches!(
            self,
            DataError::SourceUnreachable { .. } | DataError::MalformedChain(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrade_classification() {
        assert!(DataError::MalformedChain("empty".into()).triggers_degrade());
        assert!(DataError::SourceUnreachable {
            source_name: "proxy",
            reason: "timeout".into()
        }
        .triggers_degrade());
        assert!(!DataError::RateLimited.triggers_degrade());
        assert!(!DataError::InvalidLeg {
            index: 0,
            reason: "bad strike".into()
        }
        .triggers_degrade());
    }
}
