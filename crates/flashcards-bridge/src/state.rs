//! Bridge lifecycle
//!
//! ```text
//! Uninitialized
//!   ↓ start
//! Starting  (storage read, core constructed, ports subscribed)
//!   ↓ ok                ↓ error
//! Running           Uninitialized
//! ```
//!
//! `Running` is terminal for the life of the process.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeState {
    #[default]
    Uninitialized,
    Starting,
    Running,
}

impl BridgeState {
    pub fn can_transition_to(&self, target: BridgeState) -> bool {
        matches!(
            (self, target),
            (BridgeState::Uninitialized, BridgeState::Starting)
                | (BridgeState::Starting, BridgeState::Running)
                | (BridgeState::Starting, BridgeState::Uninitialized)
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, BridgeState::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeState::Uninitialized => "uninitialized",
            BridgeState::Starting => "starting",
            BridgeState::Running => "running",
        }
    }
}

impl std::fmt::Display for BridgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
