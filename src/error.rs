use thiserror::Error;

/// Main error type for the box claimer
#[derive(Error, Debug)]
pub enum BoxclaimError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} rejected request: {reason}")]
    RemoteService { service: String, reason: String },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Chain errors
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Transaction submission failed: {0}")]
    ChainSubmission(String),

    #[error("Transaction confirmation failed: {0}")]
    ChainConfirmation(String),

    /// `step` is `"submission"` or `"confirmation of <tx hash>"`
    #[error("Transaction {step} timed out after {secs}s")]
    ChainTimeout { step: String, secs: u64 },

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl BoxclaimError {
    pub fn remote(service: &str, reason: impl Into<String>) -> Self {
        BoxclaimError::RemoteService {
            service: service.to_string(),
            reason: reason.into(),
        }
    }

    /// Configuration errors are the only fatal class; everything else is
    /// absorbed by the claim cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BoxclaimError::Config(_)
                | BoxclaimError::MissingConfig(_)
                | BoxclaimError::InvalidConfig(_)
        )
    }
}

/// Result type alias for BoxclaimError
pub type Result<T> = std::result::Result<T, BoxclaimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_lists_every_key() {
        let err = BoxclaimError::MissingConfig(vec!["PRIVATE_KEY".into(), "FID".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required configuration: PRIVATE_KEY, FID"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_remote_errors_are_not_fatal() {
        let err = BoxclaimError::remote("cooldown", "HTTP 500");
        assert_eq!(err.to_string(), "cooldown rejected request: HTTP 500");
        assert!(!err.is_fatal());
        assert!(!BoxclaimError::Reverted("0xabc".into()).is_fatal());
    }
}
