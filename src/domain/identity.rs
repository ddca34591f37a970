use serde::{Deserialize, Serialize};
use std::fmt;

/// Claimant handle shared by the cooldown service, the leaderboard and the
/// social platform. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form, when the handle is a plain integer id.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// JSON value used in request bodies: a number for numeric handles,
    /// a string otherwise.
    pub fn to_json(&self) -> serde_json::Value {
        match self.as_number() {
            Some(n) => serde_json::Value::from(n),
            None => serde_json::Value::from(self.0.clone()),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
