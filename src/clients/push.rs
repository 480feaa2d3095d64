use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct PushResult {
    success: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    #[serde(default)]
    success_count: u32,
    #[serde(default)]
    failure_count: u32,
    #[serde(default)]
    results: Vec<PushResult>,
}

/// Multicast push notifier. Every caller treats delivery as best-effort:
/// failures are logged, never propagated.
#[derive(Clone)]
pub struct PushClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl PushClient {
    pub fn new(base: &str, api_key: &str) -> AppResult<Self> {
        let base = base
            .parse()
            .map_err(|e| AppError::Internal(format!("{} is not a valid url: {}", base, e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            api_key: api_key.to_string(),
        })
    }

    /// Send one notification to many device tokens. Logs per-token
    /// failures and returns nothing; a dead notifier must never fail the
    /// operation that triggered it.
    pub async fn notify_tokens(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) {
        if tokens.is_empty() {
            return;
        }

        let url = match self.base.join("/v1/messages:sendMulticast") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("push notifier url error: {}", e);
                return;
            }
        };

        let payload = json!({
            "tokens": tokens,
            "notification": { "title": title, "body": body },
            "data": data,
            "android": { "priority": "high", "ttl": 180 },
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("push notifier unreachable: {}", e);
                return;
            }
        };

        match response.json::<PushResponse>().await {
            Ok(result) => {
                if result.failure_count > 0 {
                    tracing::warn!(
                        success = result.success_count,
                        failed = result.failure_count,
                        "some push notifications failed"
                    );
                    for (idx, r) in result.results.iter().enumerate() {
                        if !r.success {
                            tracing::warn!(
                                token_index = idx,
                                error = r.error.as_deref().unwrap_or("unknown"),
                                "push delivery failed"
                            );
                        }
                    }
                }
            }
            Err(e) => tracing::warn!("unreadable push notifier response: {}", e),
        }
    }
}
