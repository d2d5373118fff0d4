//! # Data Mode Definitions
//!
//! Source-arbitration state for the terminal's data layer.
//!
//! ## Description
//! The terminal starts fully simulated and earns its way up to live data
//! one probe at a time. Transitions are pure value-to-value functions; the
//! arbiter owns the current value and never mutates it ambiently. A mode
//! never changes by more than one level per event, in either direction.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use serde::{Deserialize, Serialize};

/// Which tiers of data source are currently trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    /// Simulated data only. Initial state.
    Demo,
    /// Remote quote API reachable; chains remain simulated.
    RemoteOnly,
    /// Remote quotes plus local proxy chains.
    Hybrid,
}

impl DataMode {
    /// One successful probe moves up exactly one level.
    pub fn upgrade(self) -> Self {
        match self {
            DataMode::Demo => DataMode::RemoteOnly,
            DataMode::RemoteOnly => DataMode::Hybrid,
            DataMode::Hybrid => DataMode::Hybrid,
        }
    }

    /// One failure moves down exactly one level.
    pub fn downgrade(self) -> Self {
        match self {
            DataMode::Hybrid => DataMode::RemoteOnly,
            DataMode::RemoteOnly => DataMode::Demo,
            DataMode::Demo => DataMode::Demo,
        }
    }

    /// Quote requests may go to the remote API.
    pub fn remote_allowed(self) -> bool {
        self != DataMode::Demo
    }

    /// Chain, surface, and term-structure requests may go to the proxy.
    pub fn proxy_allowed(self) -> bool {
        self == DataMode::Hybrid
    }
}

impl Default for DataMode {
    fn default() -> Self {
        Self::Demo
    }
}

impl std::fmt::Display for DataMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => write!(f, "DEMO"),
            Self::RemoteOnly => write!(f, "REMOTE"),
            Self::Hybrid => write!(f, "HYBRID"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrades_are_single_step() {
        assert_eq!(DataMode::Demo.upgrade(), DataMode::RemoteOnly);
        assert_eq!(DataMode::RemoteOnly.upgrade(), DataMode::Hybrid);
        assert_eq!(DataMode::Hybrid.upgrade(), DataMode::Hybrid);
    }

    #[test]
    fn test_downgrades_are_single_step() {
        assert_eq!(DataMode::Hybrid.downgrade(), DataMode::RemoteOnly);
        assert_eq!(DataMode::RemoteOnly.downgrade(), DataMode::Demo);
        assert_eq!(DataMode::Demo.downgrade(), DataMode::Demo);
    }

    #[test]
    fn test_no_level_is_ever_skipped() {
        // Any sequence of transitions moves through adjacent levels only.
        let mut mode = DataMode::Demo;
        for step in [true, true, false, true, false, false, false] {
            let next = if step { mode.upgrade() } else { mode.downgrade() };
            let distance = (next as i32 - mode as i32).abs();
            assert!(distance <= 1, "skipped a level: {mode} -> {next}");
            mode = next;
        }
    }

    #[test]
    fn test_dispatch_gates() {
        assert!(!DataMode::Demo.remote_allowed());
        assert!(DataMode::RemoteOnly.remote_allowed());
        assert!(!DataMode::RemoteOnly.proxy_allowed());
        assert!(DataMode::Hybrid.proxy_allowed());
    }
}
