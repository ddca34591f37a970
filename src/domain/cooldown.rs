use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cooldown window between two claims (3 hours)
pub const DEFAULT_COOLDOWN_WINDOW: Duration = Duration::from_secs(3 * 60 * 60);

/// Last-claim information as reported by the cooldown service.
///
/// `last_open_ms == None` means no prior claim is known (or the read failed)
/// and the identity is treated as immediately eligible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownState {
    pub last_open_ms: Option<i64>,
}

impl CooldownState {
    pub fn absent() -> Self {
        Self { last_open_ms: None }
    }

    pub fn opened_at(last_open_ms: i64) -> Self {
        Self {
            last_open_ms: Some(last_open_ms),
        }
    }

    /// `last_open + window`, if a last open is known
    pub fn next_eligible_ms(&self, window: Duration) -> Option<i64> {
        self.last_open_ms
            .map(|last| last.saturating_add(window.as_millis() as i64))
    }
}

/// Go/no-go decision derived from a fresh cooldown read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    ClaimNow,
    Wait(PendingWait),
}

/// Wait target, recomputed every cycle and never cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWait {
    pub last_open_ms: i64,
    pub next_eligible_ms: i64,
}

impl PendingWait {
    /// Remaining wait at `now_ms`, zero once eligible
    pub fn remaining_at(&self, now_ms: i64) -> Duration {
        let remaining = self.next_eligible_ms.saturating_sub(now_ms);
        Duration::from_millis(remaining.max(0) as u64)
    }
}

/// Decide whether to claim now or wait for the cooldown window to pass.
pub fn decide(state: CooldownState, now_ms: i64, window: Duration) -> CycleDecision {
    match (state.last_open_ms, state.next_eligible_ms(window)) {
        (Some(last_open_ms), Some(next_eligible_ms)) if now_ms < next_eligible_ms => {
            CycleDecision::Wait(PendingWait {
                last_open_ms,
                next_eligible_ms,
            })
        }
        _ => CycleDecision::ClaimNow,
    }
}

/// Render a remaining duration as `"{h}h {m}m {s}s"`.
pub fn format_remaining(remaining_ms: i64) -> String {
    if remaining_ms <= 0 {
        return "0h 0m 0s".to_string();
    }
    let total_secs = remaining_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Render an epoch-millis timestamp in local time.
pub fn format_timestamp(ts_ms: i64) -> String {
    match Local.timestamp_millis_opt(ts_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{}ms", ts_ms),
    }
}
