//! Claim orchestration
//!
//! One identity, one claim per cycle, forever:
//! - `tracker` reads the last-open timestamp (fail-open on errors)
//! - `executor` tries the on-chain claim, then the off-chain fallback
//! - `ledger` credits points after a successful claim and reads rank/score
//! - `scheduler` runs CHECK_COOLDOWN -> WAITING -> CLAIMING -> REPORTING

pub mod clock;
pub mod executor;
pub mod ledger;
pub mod scheduler;
pub mod tracker;
pub mod traits;

pub use clock::SystemClock;
pub use executor::ClaimExecutor;
pub use ledger::RewardLedger;
pub use scheduler::{CycleReport, CycleScheduler, SchedulerSettings};
pub use tracker::CooldownTracker;
pub use traits::{Clock, CooldownService, LedgerStore, OnChainClaimer, SocialPlatform};
