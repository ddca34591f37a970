use std::sync::Arc;
use tracing::{debug, warn};

use crate::claim::traits::CooldownService;
use crate::domain::{CooldownState, Identity};

/// Reads the last-open timestamp from the cooldown service.
///
/// Read failures are logged and reported as an absent timestamp, so a flaky
/// service leads to a claim attempt rather than a stalled loop.
pub struct CooldownTracker {
    service: Arc<dyn CooldownService>,
}

impl CooldownTracker {
    pub fn new(service: Arc<dyn CooldownService>) -> Self {
        Self { service }
    }

    pub async fn fetch_cooldown(&self, identity: &Identity) -> CooldownState {
        match self.service.last_open(identity).await {
            Ok(Some(last_open_ms)) => {
                debug!("Cooldown for {}: last open at {}", identity, last_open_ms);
                CooldownState::opened_at(last_open_ms)
            }
            Ok(None) => {
                debug!("No recorded claim for {}", identity);
                CooldownState::absent()
            }
            Err(e) => {
                warn!("Failed to fetch cooldown for {}: {}", identity, e);
                CooldownState::absent()
            }
        }
    }
}
