//! Leaderboard store over the Upstash REST pipeline endpoint
//!
//! Every call is a single `POST <url>/pipeline` carrying a JSON array of
//! commands; the reply is one `{"result": ...}` or `{"error": ...}` object
//! per command, in order.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::claim::LedgerStore;
use crate::config::{LedgerConfig, Secret};
use crate::domain::{HistoryEntry, Identity};
use crate::error::{BoxclaimError, Result};

const SERVICE: &str = "leaderboard store";

/// One command's reply in a pipeline response
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineReply {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
}

/// Authorization header value; bare tokens get a `Bearer ` prefix.
pub fn bearer(auth: &str) -> String {
    let auth = auth.trim();
    if auth
        .get(..7)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("bearer "))
    {
        auth.to_string()
    } else {
        format!("Bearer {}", auth)
    }
}

/// Fail on the first command error, otherwise return the results in order
pub fn unwrap_replies(replies: Vec<PipelineReply>, expected: usize) -> Result<Vec<Value>> {
    if replies.len() != expected {
        return Err(BoxclaimError::remote(
            SERVICE,
            format!("expected {} replies, got {}", expected, replies.len()),
        ));
    }
    replies
        .into_iter()
        .map(|reply| match reply.error {
            Some(err) => Err(BoxclaimError::remote(SERVICE, err)),
            None => Ok(reply.result),
        })
        .collect()
}

/// Scores come back as strings (`"120"`) from ZSCORE
pub fn parse_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn parse_rank(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Clone)]
pub struct UpstashLedger {
    http: Client,
    pipeline_url: String,
    auth: Secret,
    leaderboard_key: String,
    history_prefix: String,
}

impl UpstashLedger {
    pub fn new(
        url: &str,
        auth: Secret,
        leaderboard_key: &str,
        history_prefix: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent("boxclaim/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            pipeline_url: format!("{}/pipeline", url.trim_end_matches('/')),
            auth,
            leaderboard_key: leaderboard_key.to_string(),
            history_prefix: history_prefix.to_string(),
        })
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        Self::new(
            &config.url,
            config.auth.clone(),
            &config.leaderboard_key,
            &config.history_prefix,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn history_key(&self, identity: &Identity) -> String {
        format!("{}{}", self.history_prefix, identity)
    }

    pub fn credit_commands(&self, identity: &Identity, entry: &HistoryEntry) -> Result<Value> {
        let record = serde_json::to_string(entry)?;
        Ok(json!([
            ["ZINCRBY", self.leaderboard_key, entry.amount.to_string(), identity.as_str()],
            ["LPUSH", self.history_key(identity), record],
        ]))
    }

    pub fn status_commands(&self, identity: &Identity) -> Value {
        json!([
            ["ZSCORE", self.leaderboard_key, identity.as_str()],
            ["ZREVRANK", self.leaderboard_key, identity.as_str()],
        ])
    }

    async fn pipeline(&self, commands: &Value) -> Result<Vec<PipelineReply>> {
        let resp = self
            .http
            .post(&self.pipeline_url)
            .header(AUTHORIZATION, bearer(self.auth.expose()))
            .header(CONTENT_TYPE, "application/json")
            .json(commands)
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

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl LedgerStore for UpstashLedger {
    async fn credit(&self, identity: &Identity, entry: &HistoryEntry) -> Result<()> {
        let commands = self.credit_commands(identity, entry)?;
        let results = unwrap_replies(self.pipeline(&commands).await?, 2)?;
        debug!("Credit applied for {}: new score {:?}", identity, results[0]);
        Ok(())
    }

    async fn score_and_rank(&self, identity: &Identity) -> Result<(Option<f64>, Option<u64>)> {
        let commands = self.status_commands(identity);
        let results = unwrap_replies(self.pipeline(&commands).await?, 2)?;
        Ok((parse_score(&results[0]), parse_rank(&results[1])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> UpstashLedger {
        UpstashLedger::new(
            "https://ledger.example.org/",
            Secret::new("token"),
            "leaderboard",
            "history:",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(bearer("abc"), "Bearer abc");
        assert_eq!(bearer("Bearer abc"), "Bearer abc");
        assert_eq!(bearer("bearer abc"), "bearer abc");
    }

    #[test]
    fn test_credit_is_one_pipeline_of_two_commands() {
        let identity = Identity::new("4211").unwrap();
        let entry = HistoryEntry {
            timestamp: 1,
            method: "on-chain".into(),
            amount: 10,
        };
        let commands = ledger().credit_commands(&identity, &entry).unwrap();
        assert_eq!(
            commands,
            json!([
                ["ZINCRBY", "leaderboard", "10", "4211"],
                ["LPUSH", "history:4211", r#"{"timestamp":1,"method":"on-chain","amount":10}"#],
            ])
        );
    }

    #[test]
    fn test_status_replies() {
        let replies: Vec<PipelineReply> =
            serde_json::from_value(json!([{"result": "120"}, {"result": 0}])).unwrap();
        let values = unwrap_replies(replies, 2).unwrap();
        assert_eq!(parse_score(&values[0]), Some(120.0));
        assert_eq!(parse_rank(&values[1]), Some(0));
    }

    #[test]
    fn test_unranked_member_reads_none() {
        let replies: Vec<PipelineReply> =
            serde_json::from_value(json!([{"result": null}, {"result": null}])).unwrap();
        let values = unwrap_replies(replies, 2).unwrap();
        assert_eq!(parse_score(&values[0]), None);
        assert_eq!(parse_rank(&values[1]), None);
    }

    #[test]
    fn test_command_error_fails_pipeline() {
        let replies: Vec<PipelineReply> = serde_json::from_value(json!([
            {"result": "1"},
            {"error": "WRONGTYPE Operation against a key holding the wrong kind of value"}
        ]))
        .unwrap();
        assert!(unwrap_replies(replies, 2).is_err());

        let short: Vec<PipelineReply> = serde_json::from_value(json!([{"result": "1"}])).unwrap();
        assert!(unwrap_replies(short, 2).is_err());
    }
}
