//! Two-path claim executor
//!
//! Tries the contract call first and falls back to the cooldown service's
//! off-chain claim when anything on-chain fails. Each path runs at most once
//! per attempt, and on-chain success never touches the off-chain path.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::claim::traits::{Clock, CooldownService, OnChainClaimer};
use crate::domain::{ClaimOutcome, ClaimStage, Identity};

pub struct ClaimExecutor {
    chain: Arc<dyn OnChainClaimer>,
    cooldown: Arc<dyn CooldownService>,
    clock: Arc<dyn Clock>,
}

impl ClaimExecutor {
    pub fn new(
        chain: Arc<dyn OnChainClaimer>,
        cooldown: Arc<dyn CooldownService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chain,
            cooldown,
            clock,
        }
    }

    /// Run one claim attempt to completion. Never returns an error: failures
    /// of both paths are reported as a failed outcome.
    pub async fn attempt_claim(&self, identity: &Identity) -> ClaimOutcome {
        let mut stage = ClaimStage::start();

        loop {
            stage = match stage {
                ClaimStage::OnChain => self.on_chain_stage().await,
                ClaimStage::OffChain => self.off_chain_stage(identity).await,
                ClaimStage::Done(outcome) => return outcome,
            };
        }
    }

    async fn on_chain_stage(&self) -> ClaimStage {
        info!("Attempting on-chain claim (openBox)...");
        match self.chain.open_box().await {
            Ok(tx_hash) => {
                info!("On-chain claim confirmed: {}", tx_hash);
                ClaimStage::Done(ClaimOutcome::on_chain(tx_hash))
            }
            Err(e) => {
                warn!("On-chain claim failed, falling back to API: {}", e);
                ClaimStage::OffChain
            }
        }
    }

    async fn off_chain_stage(&self, identity: &Identity) -> ClaimStage {
        let timestamp_ms = self.clock.now_ms();
        match self.cooldown.submit_claim(identity, timestamp_ms).await {
            Ok(true) => {
                info!("API claim accepted (fallback)");
                ClaimStage::Done(ClaimOutcome::off_chain())
            }
            Ok(false) => {
                warn!("API claim rejected or already claimed this window");
                ClaimStage::Done(ClaimOutcome::failed())
            }
            Err(e) => {
                error!("API claim request failed: {}", e);
                ClaimStage::Done(ClaimOutcome::failed())
            }
        }
    }
}
