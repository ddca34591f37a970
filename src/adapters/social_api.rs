//! Social platform client: display-name lookup and engagement events

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::adapters::upstash::bearer;
use crate::claim::SocialPlatform;
use crate::config::{Secret, SocialConfig};
use crate::domain::{ClaimPath, Identity};
use crate::error::{BoxclaimError, Result};

const SERVICE: &str = "social platform";

/// Pull a display name out of a user payload. Accepts a flat object, a
/// `user` wrapper or a `users` list.
pub fn extract_display_name(body: &Value) -> Option<String> {
    let user = body
        .get("user")
        .or_else(|| body.get("users").and_then(|u| u.get(0)))
        .unwrap_or(body);

    user.get("display_name")
        .or_else(|| user.get("displayName"))
        .or_else(|| user.get("username"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
}

#[derive(Clone)]
pub struct SocialApiClient {
    http: Client,
    base_url: String,
    api_key: Secret,
    identity_param: String,
}

impl SocialApiClient {
    pub fn new(
        base_url: &str,
        api_key: Secret,
        identity_param: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent("boxclaim/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            identity_param: identity_param.to_string(),
        })
    }

    /// `None` when the integration is not configured
    pub fn from_config(config: &SocialConfig) -> Result<Option<Self>> {
        if !config.enabled() {
            return Ok(None);
        }
        Self::new(
            &config.base_url,
            config.api_key.clone(),
            &config.identity_param,
            Duration::from_secs(config.request_timeout_secs),
        )
        .map(Some)
    }

    fn engagement_body(&self, identity: &Identity, path: ClaimPath, timestamp_ms: i64) -> Value {
        let mut body = Map::new();
        body.insert(self.identity_param.clone(), identity.to_json());
        body.insert("event".to_string(), Value::from("box_opened"));
        body.insert("method".to_string(), Value::from(path.as_str()));
        body.insert("timestamp".to_string(), Value::from(timestamp_ms));
        Value::Object(body)
    }
}

#[async_trait]
impl SocialPlatform for SocialApiClient {
    async fn display_name(&self, identity: &Identity) -> Result<Option<String>> {
        let resp = self
            .http
            .get(format!("{}/user", self.base_url))
            .query(&[(self.identity_param.as_str(), identity.as_str())])
            .header(AUTHORIZATION, bearer(self.api_key.expose()))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BoxclaimError::remote(SERVICE, format!("HTTP {}", status)));
        }

        let body: Value = resp.json().await?;
        Ok(extract_display_name(&body))
    }

    async fn register_engagement(
        &self,
        identity: &Identity,
        path: ClaimPath,
        timestamp_ms: i64,
    ) -> Result<()> {
        let body = self.engagement_body(identity, path, timestamp_ms);

        let resp = self
            .http
            .put(format!("{}/engagement", self.base_url))
            .header(AUTHORIZATION, bearer(self.api_key.expose()))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(BoxclaimError::remote(
                SERVICE,
                format!("HTTP {}: {}", status, text),
            ));
        }

        debug!("Engagement registered for {} via {}", identity, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_display_name_shapes() {
        assert_eq!(
            extract_display_name(&json!({"display_name": "Alice"})).as_deref(),
            Some("Alice")
        );
        assert_eq!(
            extract_display_name(&json!({"user": {"displayName": "Bob"}})).as_deref(),
            Some("Bob")
        );
        assert_eq!(
            extract_display_name(&json!({"users": [{"username": "carol"}]})).as_deref(),
            Some("carol")
        );
        assert_eq!(extract_display_name(&json!({"user": {"display_name": "  "}})), None);
    }

    #[test]
    fn test_disabled_without_key() {
        let config = SocialConfig {
            base_url: "https://social.example.org".into(),
            ..SocialConfig::default()
        };
        assert!(SocialApiClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_engagement_body_uses_identity_param() {
        let client = SocialApiClient::new(
            "https://social.example.org",
            Secret::new("key"),
            "user_id",
            Duration::from_secs(5),
        )
        .unwrap();
        let body = client.engagement_body(
            &Identity::new("4211").unwrap(),
            ClaimPath::OffChain,
            1_700_000_000_000,
        );
        assert_eq!(
            body,
            json!({
                "user_id": 4211,
                "event": "box_opened",
                "method": "api",
                "timestamp": 1_700_000_000_000i64,
            })
        );
    }
}
