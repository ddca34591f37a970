use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ClaimPath;

/// A value read from the leaderboard, or `Unknown` when the read failed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Reading<T> {
    Known(T),
    Unknown,
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        value.map(Reading::Known).unwrap_or(Reading::Unknown)
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Known(v) => write!(f, "{}", v),
            Reading::Unknown => write!(f, "N/A"),
        }
    }
}

/// Score and 1-based rank of the identity on the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerStatus {
    pub score: Reading<f64>,
    pub rank: Reading<u64>,
}

impl LedgerStatus {
    pub fn unknown() -> Self {
        Self {
            score: Reading::Unknown,
            rank: Reading::Unknown,
        }
    }

    /// Build from raw store replies. `zero_based_rank` is the reverse rank
    /// as returned by the store (0 = highest score).
    pub fn from_store(score: Option<f64>, zero_based_rank: Option<u64>) -> Self {
        Self {
            score: score.into(),
            rank: zero_based_rank.map(|r| r + 1).into(),
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rank: {} | Points: {}", self.rank, self.score)
    }
}

/// History record appended to the identity's list after a credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: i64,
    pub method: String,
    pub amount: u64,
}

impl HistoryEntry {
    pub fn new(timestamp: i64, method: ClaimPath, amount: u64) -> Self {
        Self {
            timestamp,
            method: method.as_str().to_string(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_one_based() {
        let status = LedgerStatus::from_store(Some(120.0), Some(0));
        assert_eq!(status.rank, Reading::Known(1));
        assert_eq!(status.score, Reading::Known(120.0));
        assert_eq!(status.to_string(), "Rank: 1 | Points: 120");
    }

    #[test]
    fn test_missing_member_is_unknown() {
        let status = LedgerStatus::from_store(None, None);
        assert_eq!(status, LedgerStatus::unknown());
        assert_eq!(status.to_string(), "Rank: N/A | Points: N/A");
    }

    #[test]
    fn test_history_entry_shape() {
        let entry = HistoryEntry::new(1_700_000_000_000, ClaimPath::OnChain, 10);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"timestamp": 1_700_000_000_000i64, "method": "on-chain", "amount": 10})
        );
    }
}
