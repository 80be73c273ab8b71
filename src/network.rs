use anyhow::{Result, anyhow, bail};
use reqwest::Client;
use serde_json::{Value, json};

use crate::config::Settings;
use crate::prompts::{SUMMARY_INSTRUCTION, USER_PREFIX};

/// Client for the chat-completion endpoint. One POST per call, no retries,
/// no timeout, no streaming.
pub struct SummaryClient {
    http: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl SummaryClient {
    pub fn new(api_base: String, api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            api_base,
            api_key,
            model,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.api_base().to_string(),
            settings.api_key.clone().unwrap_or_default(),
            settings.model.clone(),
        )
    }

    /// Sends `text` to the completion endpoint and returns the first choice's
    /// message content unmodified. The content is expected to carry HTML
    /// markup and is rendered without sanitization downstream.
    pub async fn get_summary(&self, text: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "assistant", "content": SUMMARY_INSTRUCTION },
                { "role": "user", "content": format!("{}{}", USER_PREFIX, text) },
            ],
        });

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("completion request failed with status {}", response.status());
        }

        let payload: Value = response.json().await?;
        payload
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("no message content in completion response"))
    }
}
