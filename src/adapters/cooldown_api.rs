//! Cooldown service client
//!
//! `GET <endpoint>?<param>=<identity>` returns `{"lastOpen": <millis>|null}`;
//! `POST <endpoint>` with `{<param>: <identity>, "timestamp": <millis>}`
//! returns `{"ok": bool}`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::claim::CooldownService;
use crate::config::CooldownConfig;
use crate::domain::Identity;
use crate::error::{BoxclaimError, Result};

const SERVICE: &str = "cooldown service";

#[derive(Debug, Deserialize)]
struct CooldownResponse {
    #[serde(rename = "lastOpen", default)]
    last_open: Value,
}

#[derive(Debug, Deserialize)]
struct ClaimResponse {
    #[serde(default)]
    ok: bool,
}

/// Read a `lastOpen` value. Numbers and numeric strings are accepted; null,
/// zero and anything else mean "no prior claim".
pub fn parse_last_open(value: &Value) -> Option<i64> {
    let ms = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (ms > 0).then_some(ms)
}

#[derive(Clone)]
pub struct CooldownApiClient {
    http: Client,
    endpoint: String,
    identity_param: String,
}

impl CooldownApiClient {
    pub fn new(base_url: &str, path: &str, identity_param: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent("boxclaim/0.1")
            .timeout(timeout)
            .build()?;

        let endpoint = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        Ok(Self {
            http,
            endpoint,
            identity_param: identity_param.to_string(),
        })
    }

    pub fn from_config(config: &CooldownConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.path,
            &config.identity_param,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn claim_body(&self, identity: &Identity, timestamp_ms: i64) -> Value {
        let mut body = Map::new();
        body.insert(self.identity_param.clone(), identity.to_json());
        body.insert("timestamp".to_string(), Value::from(timestamp_ms));
        Value::Object(body)
    }
}

#[async_trait]
impl CooldownService for CooldownApiClient {
    async fn last_open(&self, identity: &Identity) -> Result<Option<i64>> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[(self.identity_param.as_str(), identity.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BoxclaimError::remote(
                SERVICE,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let parsed: CooldownResponse = resp.json().await?;
        debug!("Cooldown response for {}: {:?}", identity, parsed);
        Ok(parse_last_open(&parsed.last_open))
    }

    async fn submit_claim(&self, identity: &Identity, timestamp_ms: i64) -> Result<bool> {
        let body = self.claim_body(identity, timestamp_ms);
        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        // Rejections may come back as non-2xx with an `ok: false` body
        match serde_json::from_str::<ClaimResponse>(&text) {
            Ok(parsed) => {
                debug!("Claim response ({}): ok={}", status, parsed.ok);
                Ok(parsed.ok)
            }
            Err(_) if !status.is_success() => Err(BoxclaimError::remote(
                SERVICE,
                format!("HTTP {}: {}", status, text),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_last_open() {
        assert_eq!(parse_last_open(&json!(1_700_000_000_000i64)), Some(1_700_000_000_000));
        assert_eq!(parse_last_open(&json!(1.7e12)), Some(1_700_000_000_000));
        assert_eq!(parse_last_open(&json!("1700000000000")), Some(1_700_000_000_000));
        assert_eq!(parse_last_open(&json!(null)), None);
        assert_eq!(parse_last_open(&json!(0)), None);
        assert_eq!(parse_last_open(&json!({"at": 1})), None);
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client = CooldownApiClient::new(
            "https://box.example.org/",
            "/api/box-cooldown",
            "fid",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "https://box.example.org/api/box-cooldown");
    }

    #[test]
    fn test_claim_body_uses_identity_param() {
        let client =
            CooldownApiClient::new("https://box.example.org", "cooldown", "id", Duration::from_secs(5))
                .unwrap();
        let body = client.claim_body(&Identity::new("4211").unwrap(), 1_700_000_000_000);
        assert_eq!(body, json!({"id": 4211, "timestamp": 1_700_000_000_000i64}));
    }
}
