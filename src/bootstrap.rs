//! Builds the claim components from a validated configuration.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::adapters::{BoxContractClaimer, CooldownApiClient, SocialApiClient, UpstashLedger};
use crate::claim::{
    ClaimExecutor, Clock, CooldownService, CooldownTracker, CycleScheduler, LedgerStore,
    RewardLedger, SchedulerSettings, SystemClock,
};
use crate::config::AppConfig;
use crate::domain::Identity;
use crate::error::Result;

pub struct Components {
    pub identity: Identity,
    pub cooldown_window: Duration,
    /// Standalone handles for the one-shot status commands
    pub tracker: CooldownTracker,
    pub ledger: RewardLedger,
    pub clock: Arc<dyn Clock>,
    pub scheduler: CycleScheduler,
}

impl Components {
    /// Validate `config` and wire every client. Fails before any network
    /// traffic when a required value is missing or malformed.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let identity = config.identity()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let cooldown: Arc<dyn CooldownService> =
            Arc::new(CooldownApiClient::from_config(&config.cooldown)?);
        let store: Arc<dyn LedgerStore> = Arc::new(UpstashLedger::from_config(&config.ledger)?);
        let chain = BoxContractClaimer::from_config(&config.chain)?;
        info!(
            "Claiming for {} with wallet {} on contract {}",
            identity,
            chain.wallet_address(),
            config.chain.contract_address.trim()
        );

        let settings = SchedulerSettings {
            cooldown_window: config.cooldown_window(),
            countdown_tick: config.countdown_tick(),
            reward_points: config.ledger.reward_points,
        };

        let mut scheduler = CycleScheduler::new(
            identity.clone(),
            CooldownTracker::new(cooldown.clone()),
            ClaimExecutor::new(Arc::new(chain), cooldown.clone(), clock.clone()),
            RewardLedger::new(store.clone(), clock.clone()),
            clock.clone(),
            settings,
        );

        if let Some(social) = SocialApiClient::from_config(&config.social)? {
            info!("Social engagement events enabled");
            scheduler = scheduler.with_social(Arc::new(social));
        }

        Ok(Self {
            identity,
            cooldown_window: config.cooldown_window(),
            tracker: CooldownTracker::new(cooldown),
            ledger: RewardLedger::new(store, clock.clone()),
            clock,
            scheduler,
        })
    }
}
