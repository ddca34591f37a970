use serde::{Deserialize, Serialize};
use std::fmt;

/// Claim cycle state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleState {
    /// Reading the last-open timestamp from the cooldown service
    CheckCooldown,
    /// Cooldown window still running, sleeping until eligible
    Waiting,
    /// One claim attempt in flight (on-chain, then off-chain)
    Claiming,
    /// Crediting and reporting score/rank
    Reporting,
}

impl CycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleState::CheckCooldown => "CHECK_COOLDOWN",
            CycleState::Waiting => "WAITING",
            CycleState::Claiming => "CLAIMING",
            CycleState::Reporting => "REPORTING",
        }
    }

    /// Check if this state can transition to another state
    pub fn can_transition_to(&self, target: CycleState) -> bool {
        use CycleState::*;

        matches!(
            (self, target),
            (CheckCooldown, Waiting)
                | (CheckCooldown, Claiming)
                | (Waiting, Claiming)
                | (Claiming, Reporting)
                | (Reporting, CheckCooldown)
        )
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
