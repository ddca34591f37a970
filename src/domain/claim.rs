use serde::{Deserialize, Serialize};
use std::fmt;

/// Which claim mechanism produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimPath {
    OnChain,
    #[serde(rename = "api")]
    OffChain,
    None,
}

impl ClaimPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimPath::OnChain => "on-chain",
            ClaimPath::OffChain => "api",
            ClaimPath::None => "none",
        }
    }
}

impl fmt::Display for ClaimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one claim attempt. Built fresh per attempt and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub succeeded: bool,
    pub path: ClaimPath,
    pub transaction_reference: Option<String>,
}

impl ClaimOutcome {
    pub fn on_chain(tx_hash: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            path: ClaimPath::OnChain,
            transaction_reference: Some(tx_hash.into()),
        }
    }

    pub fn off_chain() -> Self {
        Self {
            succeeded: true,
            path: ClaimPath::OffChain,
            transaction_reference: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            succeeded: false,
            path: ClaimPath::None,
            transaction_reference: None,
        }
    }
}

/// Stages of a single claim attempt.
///
/// Each stage runs at most once; `OnChain` can only be followed by `OffChain`
/// or `Done`, and `OffChain` always ends in `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimStage {
    OnChain,
    OffChain,
    Done(ClaimOutcome),
}

impl ClaimStage {
    pub fn start() -> Self {
        ClaimStage::OnChain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        let chain = ClaimOutcome::on_chain("0xdead");
        assert!(chain.succeeded);
        assert_eq!(chain.path, ClaimPath::OnChain);
        assert_eq!(chain.transaction_reference.as_deref(), Some("0xdead"));

        let api = ClaimOutcome::off_chain();
        assert!(api.succeeded);
        assert!(api.transaction_reference.is_none());

        let failed = ClaimOutcome::failed();
        assert!(!failed.succeeded);
        assert_eq!(failed.path, ClaimPath::None);
    }

    #[test]
    fn test_stage_starts_on_chain() {
        assert_eq!(ClaimStage::start(), ClaimStage::OnChain);
    }

    #[test]
    fn test_serialized_path_matches_history_label() {
        for path in [ClaimPath::OnChain, ClaimPath::OffChain, ClaimPath::None] {
            assert_eq!(serde_json::to_value(path).unwrap(), path.as_str());
        }

        let outcome = serde_json::to_value(ClaimOutcome::off_chain()).unwrap();
        assert_eq!(outcome["path"], "api");
        let parsed: ClaimPath = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(parsed, ClaimPath::OffChain);
    }
}
