use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{ClaimPath, HistoryEntry, Identity};
use crate::error::Result;

/// Remote cooldown/claim service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CooldownService: Send + Sync {
    /// Last successful claim time in epoch millis, `None` if never claimed.
    async fn last_open(&self, identity: &Identity) -> Result<Option<i64>>;

    /// Off-chain claim. Returns the service's `ok` flag; the service enforces
    /// the cooldown window and rejects duplicates.
    async fn submit_claim(&self, identity: &Identity, timestamp_ms: i64) -> Result<bool>;
}

/// On-chain claim through the box contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OnChainClaimer: Send + Sync {
    /// Submit `openBox()` and wait for a successful receipt. Returns the
    /// transaction hash.
    async fn open_box(&self) -> Result<String>;
}

/// Remote leaderboard store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Increment the identity's score by `entry.amount` and prepend `entry`
    /// to its history, in one request.
    async fn credit(&self, identity: &Identity, entry: &HistoryEntry) -> Result<()>;

    /// Raw score and zero-based reverse rank, `None` where the identity has no entry.
    async fn score_and_rank(&self, identity: &Identity) -> Result<(Option<f64>, Option<u64>)>;
}

/// Social platform account/event API
#[async_trait]
pub trait SocialPlatform: Send + Sync {
    async fn display_name(&self, identity: &Identity) -> Result<Option<String>>;

    async fn register_engagement(
        &self,
        identity: &Identity,
        path: ClaimPath,
        timestamp_ms: i64,
    ) -> Result<()>;
}

/// Wall clock and sleep primitive
#[async_trait]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;

    async fn sleep(&self, duration: Duration);
}
