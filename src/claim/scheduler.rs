//! Cycle scheduler
//!
//! Drives CHECK_COOLDOWN -> (WAITING) -> CLAIMING -> REPORTING for one
//! identity, forever. Cooldown data is fetched fresh at the start of every
//! cycle, and the wait re-derives the remaining time from the clock on every
//! tick instead of counting down.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::claim::executor::ClaimExecutor;
use crate::claim::ledger::RewardLedger;
use crate::claim::tracker::CooldownTracker;
use crate::claim::traits::{Clock, SocialPlatform};
use crate::domain::{
    decide, format_remaining, format_timestamp, ClaimOutcome, CooldownState, CycleDecision,
    CycleState, Identity, LedgerStatus, PendingWait,
};

/// Countdown lines at `info` are rate-limited to one per this interval
const COUNTDOWN_INFO_INTERVAL_MS: i64 = 60_000;

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub cooldown_window: Duration,
    pub countdown_tick: Duration,
    pub reward_points: u64,
}

/// What happened in one cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// States visited, in order
    pub states: Vec<CycleState>,
    pub cooldown: CooldownState,
    /// Remaining wait computed when entering WAITING
    pub wait_remaining: Option<Duration>,
    pub outcome: Option<ClaimOutcome>,
    /// `Some(ok)` when a credit was issued, `None` when the claim failed
    pub credited: Option<bool>,
    pub status: Option<LedgerStatus>,
}

pub struct CycleScheduler {
    identity: Identity,
    tracker: CooldownTracker,
    executor: ClaimExecutor,
    ledger: RewardLedger,
    social: Option<Arc<dyn SocialPlatform>>,
    clock: Arc<dyn Clock>,
    settings: SchedulerSettings,
}

impl CycleScheduler {
    pub fn new(
        identity: Identity,
        tracker: CooldownTracker,
        executor: ClaimExecutor,
        ledger: RewardLedger,
        clock: Arc<dyn Clock>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            identity,
            tracker,
            executor,
            ledger,
            social: None,
            clock,
            settings,
        }
    }

    pub fn with_social(mut self, social: Arc<dyn SocialPlatform>) -> Self {
        self.social = Some(social);
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Log who we are claiming for, with the social display name if available
    pub async fn announce(&self) {
        let display_name = match &self.social {
            Some(social) => match social.display_name(&self.identity).await {
                Ok(name) => name,
                Err(e) => {
                    warn!("Failed to look up display name for {}: {}", self.identity, e);
                    None
                }
            },
            None => None,
        };

        match display_name {
            Some(name) => info!("Auto-claim started for {} ({})", self.identity, name),
            None => info!("Auto-claim started for {}", self.identity),
        }
    }

    /// Run cycles back to back. Only process shutdown ends this.
    pub async fn run(&self) {
        self.announce().await;
        loop {
            let report = self.run_cycle().await;
            debug!("Cycle finished: {:?}", report);
        }
    }

    /// Run exactly one cycle, from the cooldown read to the status report.
    #[instrument(skip(self), fields(identity = %self.identity))]
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();
        let mut pending: Option<PendingWait> = None;
        let mut state = CycleState::CheckCooldown;

        loop {
            report.states.push(state);

            let next = match state {
                CycleState::CheckCooldown => {
                    let cooldown = self.tracker.fetch_cooldown(&self.identity).await;
                    report.cooldown = cooldown;
                    let now_ms = self.clock.now_ms();
                    match decide(cooldown, now_ms, self.settings.cooldown_window) {
                        CycleDecision::ClaimNow => {
                            if cooldown.last_open_ms.is_none() {
                                info!("No cooldown data, claiming immediately");
                            } else {
                                info!("Cooldown elapsed, claiming");
                            }
                            CycleState::Claiming
                        }
                        CycleDecision::Wait(wait) => {
                            report.wait_remaining = Some(wait.remaining_at(now_ms));
                            pending = Some(wait);
                            CycleState::Waiting
                        }
                    }
                }
                CycleState::Waiting => {
                    if let Some(wait) = pending {
                        self.wait_until_eligible(wait).await;
                    }
                    CycleState::Claiming
                }
                CycleState::Claiming => {
                    let outcome = self.executor.attempt_claim(&self.identity).await;
                    report.credited = self.settle(&outcome).await;
                    report.outcome = Some(outcome);
                    CycleState::Reporting
                }
                CycleState::Reporting => {
                    let status = self.ledger.rank_and_score(&self.identity).await;
                    info!("{}", status);
                    report.status = Some(status);
                    break;
                }
            };

            debug_assert!(state.can_transition_to(next));
            debug!("{} -> {}", state, next);
            state = next;
        }

        report
    }

    /// Log the outcome and, on success, credit points and register the
    /// engagement event. Returns whether the credit went through, or `None`
    /// when nothing was claimed.
    async fn settle(&self, outcome: &ClaimOutcome) -> Option<bool> {
        if !outcome.succeeded {
            warn!("Claim failed on every path");
            return None;
        }

        info!("Claim succeeded via {}", outcome.path);
        if let Some(tx_hash) = &outcome.transaction_reference {
            info!("Tx hash: {}", tx_hash);
        }

        let credited = self
            .ledger
            .credit_points(&self.identity, self.settings.reward_points, outcome.path)
            .await;

        if let Some(social) = &self.social {
            if let Err(e) = social
                .register_engagement(&self.identity, outcome.path, self.clock.now_ms())
                .await
            {
                warn!("Failed to register engagement for {}: {}", self.identity, e);
            }
        }

        Some(credited)
    }

    async fn wait_until_eligible(&self, wait: PendingWait) {
        let status = self.ledger.rank_and_score(&self.identity).await;
        info!("{}", status);
        info!("Last open at: {}", format_timestamp(wait.last_open_ms));
        info!("Next claim at: {}", format_timestamp(wait.next_eligible_ms));

        let mut last_info_ms: Option<i64> = None;
        loop {
            let now_ms = self.clock.now_ms();
            let remaining = wait.remaining_at(now_ms);
            if remaining.is_zero() {
                break;
            }

            let text = format_remaining(remaining.as_millis() as i64);
            if last_info_ms.map_or(true, |t| now_ms - t >= COUNTDOWN_INFO_INTERVAL_MS) {
                info!("Cooldown remaining: {}", text);
                last_info_ms = Some(now_ms);
            } else {
                debug!("Cooldown remaining: {}", text);
            }

            self.clock
                .sleep(remaining.min(self.settings.countdown_tick))
                .await;
        }

        info!("Cooldown finished");
    }
}
