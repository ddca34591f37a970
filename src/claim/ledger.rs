use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::claim::traits::{Clock, LedgerStore};
use crate::domain::{ClaimPath, HistoryEntry, Identity, LedgerStatus};

/// Reward bookkeeping on the remote leaderboard.
///
/// Crediting is not linked to the claim: a failed credit is logged and left
/// as a bookkeeping gap. Status reads degrade to "unknown".
pub struct RewardLedger {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
}

impl RewardLedger {
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn credit_points(&self, identity: &Identity, amount: u64, method: ClaimPath) -> bool {
        let entry = HistoryEntry::new(self.clock.now_ms(), method, amount);
        match self.store.credit(identity, &entry).await {
            Ok(()) => {
                info!("Credited {} points to {} via {}", amount, identity, method);
                true
            }
            Err(e) => {
                error!(
                    "Failed to credit {} points to {} (claim via {} stands): {}",
                    amount, identity, method, e
                );
                false
            }
        }
    }

    pub async fn rank_and_score(&self, identity: &Identity) -> LedgerStatus {
        match self.store.score_and_rank(identity).await {
            Ok((score, rank)) => {
                debug!("Leaderboard read for {}: score={:?} rank={:?}", identity, score, rank);
                LedgerStatus::from_store(score, rank)
            }
            Err(e) => {
                warn!("Failed to read leaderboard for {}: {}", identity, e);
                LedgerStatus::unknown()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::traits::MockLedgerStore;
    use crate::domain::Reading;
    use crate::error::BoxclaimError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedClock;

    #[async_trait]
    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            42
        }

        async fn sleep(&self, _duration: Duration) {}
    }

    fn identity() -> Identity {
        Identity::new("4211").unwrap()
    }

    #[tokio::test]
    async fn test_credit_sends_history_entry() {
        let mut store = MockLedgerStore::new();
        store
            .expect_credit()
            .withf(|id, entry| {
                id.as_str() == "4211"
                    && entry.amount == 10
                    && entry.method == "api"
                    && entry.timestamp == 42
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let ledger = RewardLedger::new(Arc::new(store), Arc::new(FixedClock));
        assert!(ledger.credit_points(&identity(), 10, ClaimPath::OffChain).await);
    }

    #[tokio::test]
    async fn test_credit_failure_is_false() {
        let mut store = MockLedgerStore::new();
        store
            .expect_credit()
            .times(1)
            .returning(|_, _| Err(BoxclaimError::remote("ledger", "HTTP 401")));

        let ledger = RewardLedger::new(Arc::new(store), Arc::new(FixedClock));
        assert!(!ledger.credit_points(&identity(), 10, ClaimPath::OnChain).await);
    }

    #[tokio::test]
    async fn test_rank_is_reverse_position_plus_one() {
        let mut store = MockLedgerStore::new();
        store
            .expect_score_and_rank()
            .returning(|_| Ok((Some(250.0), Some(4))));

        let ledger = RewardLedger::new(Arc::new(store), Arc::new(FixedClock));
        let status = ledger.rank_and_score(&identity()).await;
        assert_eq!(status.rank, Reading::Known(5));
        assert_eq!(status.score, Reading::Known(250.0));
    }

    #[tokio::test]
    async fn test_read_failure_is_unknown() {
        let mut store = MockLedgerStore::new();
        store
            .expect_score_and_rank()
            .returning(|_| Err(BoxclaimError::remote("ledger", "timeout")));

        let ledger = RewardLedger::new(Arc::new(store), Arc::new(FixedClock));
        assert_eq!(
            ledger.rank_and_score(&identity()).await,
            LedgerStatus::unknown()
        );
    }
}
