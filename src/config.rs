use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::Identity;
use crate::error::{BoxclaimError, Result};

/// Flat environment variables accepted for the required settings, mapped to
/// their config keys. These take precedence over files and `BOXCLAIM_*`.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PRIVATE_KEY", "chain.private_key"),
    ("PROVIDER_URL", "chain.rpc_url"),
    ("CONTRACT_ADDRESS", "chain.contract_address"),
    ("FID", "identity"),
    ("UPSTASH_AUTH", "ledger.auth"),
];

/// Credential string that never prints and is wiped on drop
#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Claimant handle used across all remote services
    #[serde(default)]
    pub identity: String,
    pub chain: ChainConfig,
    pub cooldown: CooldownConfig,
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub social: SocialConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint
    #[serde(default)]
    pub rpc_url: String,
    /// Box contract exposing `openBox()`
    #[serde(default)]
    pub contract_address: String,
    /// Hex-encoded signing key
    #[serde(default)]
    pub private_key: Secret,
    /// Upper bound on waiting for the transaction receipt
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_secs: u64,
}

fn default_confirmation_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct CooldownConfig {
    /// Base URL of the cooldown/claim service
    pub base_url: String,
    /// Endpoint path serving both the read and the claim
    #[serde(default = "default_cooldown_path")]
    pub path: String,
    /// Name of the identity field in the query string and claim body
    #[serde(default = "default_identity_param")]
    pub identity_param: String,
    /// Cooldown window between claims
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_cooldown_path() -> String {
    "/api/box-cooldown".to_string()
}

fn default_identity_param() -> String {
    "fid".to_string()
}

fn default_window_secs() -> u64 {
    3 * 60 * 60
}

fn default_request_timeout() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Leaderboard store REST endpoint (pipeline requests go to `<url>/pipeline`)
    pub url: String,
    /// Bearer credential for the store
    #[serde(default)]
    pub auth: Secret,
    #[serde(default = "default_leaderboard_key")]
    pub leaderboard_key: String,
    /// History list key is `<history_prefix><identity>`
    #[serde(default = "default_history_prefix")]
    pub history_prefix: String,
    /// Points credited per successful claim
    #[serde(default = "default_reward_points")]
    pub reward_points: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_leaderboard_key() -> String {
    "leaderboard".to_string()
}

fn default_history_prefix() -> String {
    "history:".to_string()
}

fn default_reward_points() -> u64 {
    10
}

/// Social platform integration; disabled unless an API key is configured
#[derive(Debug, Clone, Deserialize)]
pub struct SocialConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Secret,
    /// Query/body key carrying the identity on this platform
    #[serde(default = "default_identity_param")]
    pub identity_param: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: Secret::default(),
            identity_param: default_identity_param(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl SocialConfig {
    pub fn enabled(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Countdown refresh interval while waiting
    #[serde(default = "default_countdown_tick")]
    pub countdown_tick_secs: u64,
}

fn default_countdown_tick() -> u64 {
    1
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            countdown_tick_secs: default_countdown_tick(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();

        let mut builder = Self::with_defaults()?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("BOXCLAIM_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (BOXCLAIM_CHAIN__RPC_URL, etc.)
            .add_source(
                Environment::with_prefix("BOXCLAIM")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_KEYS {
            let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Parse configuration from a TOML document layered over the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config = Self::with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("identity", "")?
            .set_default("cooldown.base_url", "https://monadbox.vercel.app")?
            .set_default("ledger.url", "https://evolved-macaw-13512.upstash.io")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("chain.confirmation_timeout_secs", default_confirmation_timeout())?
            .set_default("cooldown.window_secs", default_window_secs())?
            .set_default("scheduler.countdown_tick_secs", default_countdown_tick())?)
    }

    /// Check every required value is present and well-formed.
    ///
    /// All missing keys are reported together so a single restart fixes them.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.chain.private_key.is_empty() {
            missing.push("PRIVATE_KEY".to_string());
        }
        if self.chain.rpc_url.trim().is_empty() {
            missing.push("PROVIDER_URL".to_string());
        }
        if self.chain.contract_address.trim().is_empty() {
            missing.push("CONTRACT_ADDRESS".to_string());
        }
        if self.identity.trim().is_empty() {
            missing.push("FID".to_string());
        }
        if self.ledger.auth.is_empty() {
            missing.push("UPSTASH_AUTH".to_string());
        }
        if !missing.is_empty() {
            return Err(BoxclaimError::MissingConfig(missing));
        }

        for (name, raw) in [
            ("chain.rpc_url", &self.chain.rpc_url),
            ("cooldown.base_url", &self.cooldown.base_url),
            ("ledger.url", &self.ledger.url),
        ] {
            url::Url::parse(raw.trim()).map_err(|e| {
                BoxclaimError::InvalidConfig(format!("{} is not a valid URL: {}", name, e))
            })?;
        }

        crate::signing::parse_contract_address(&self.chain.contract_address)?;
        crate::signing::parse_signer(&self.chain.private_key)?;

        if self.cooldown.window_secs == 0 {
            return Err(BoxclaimError::InvalidConfig(
                "cooldown.window_secs must be positive".to_string(),
            ));
        }
        if self.scheduler.countdown_tick_secs == 0 {
            return Err(BoxclaimError::InvalidConfig(
                "scheduler.countdown_tick_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn identity(&self) -> Result<Identity> {
        Identity::new(self.identity.clone())
            .ok_or_else(|| BoxclaimError::MissingConfig(vec!["FID".to_string()]))
    }

    pub fn cooldown_window(&self) -> Duration {
        Duration::from_secs(self.cooldown.window_secs)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_secs(self.scheduler.countdown_tick_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known anvil development key
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn complete_toml() -> String {
        format!(
            r#"
identity = "4211"

[chain]
rpc_url = "https://rpc.example.org"
contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
private_key = "{}"

[cooldown]
base_url = "https://cooldown.example.org"

[ledger]
url = "https://ledger.example.org"
auth = "Bearer token"
"#,
            TEST_KEY
        )
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = AppConfig::from_toml_str(&complete_toml()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.cooldown.path, "/api/box-cooldown");
        assert_eq!(config.cooldown.identity_param, "fid");
        assert_eq!(config.cooldown_window(), Duration::from_secs(10_800));
        assert_eq!(config.chain.confirmation_timeout_secs, 120);
        assert_eq!(config.ledger.leaderboard_key, "leaderboard");
        assert_eq!(config.ledger.history_prefix, "history:");
        assert_eq!(config.ledger.reward_points, 10);
        assert_eq!(config.countdown_tick(), Duration::from_secs(1));
        assert!(!config.social.enabled());
        assert_eq!(config.social.identity_param, "fid");
        assert_eq!(config.identity().unwrap().as_str(), "4211");
    }

    #[test]
    fn test_missing_required_values_are_all_reported() {
        let config = AppConfig::from_toml_str(
            r#"
[chain]
rpc_url = "https://rpc.example.org"
"#,
        )
        .unwrap();

        match config.validate() {
            Err(BoxclaimError::MissingConfig(keys)) => {
                assert_eq!(
                    keys,
                    vec!["PRIVATE_KEY", "CONTRACT_ADDRESS", "FID", "UPSTASH_AUTH"]
                );
            }
            other => panic!("expected missing config, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let toml = complete_toml().replace("https://rpc.example.org", "not a url");
        let config = AppConfig::from_toml_str(&toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(BoxclaimError::InvalidConfig(_))
        ));

        let toml = complete_toml().replace("0x5FbDB2315678afecb367f032d93F642f64180aa3", "0x1234");
        let config = AppConfig::from_toml_str(&toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secrets_are_redacted() {
        let config = AppConfig::from_toml_str(&complete_toml()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ac0974bec39a17e3"));
        assert!(!debug.contains("Bearer token"));
        assert!(debug.contains("Secret(***)"));
    }

    #[test]
    fn test_social_enabled_needs_key_and_url() {
        let toml = format!(
            "{}\n[social]\nbase_url = \"https://social.example.org\"\napi_key = \"k\"\n",
            complete_toml()
        );
        let config = AppConfig::from_toml_str(&toml).unwrap();
        assert!(config.social.enabled());
    }
}
