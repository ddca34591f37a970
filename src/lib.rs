pub mod adapters;
pub mod bootstrap;
pub mod claim;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod signing;

pub use adapters::{BoxContractClaimer, CooldownApiClient, SocialApiClient, UpstashLedger};
pub use bootstrap::Components;
pub use claim::{
    ClaimExecutor, Clock, CooldownService, CooldownTracker, CycleReport, CycleScheduler,
    LedgerStore, OnChainClaimer, RewardLedger, SchedulerSettings, SocialPlatform, SystemClock,
};
pub use config::AppConfig;
pub use domain::{ClaimOutcome, ClaimPath, CooldownState, CycleState, Identity, LedgerStatus};
pub use error::{BoxclaimError, Result};
