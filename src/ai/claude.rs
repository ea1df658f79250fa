//! Claude API integration.
//!
//! Implements the Summarizer trait on top of the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompt::build_summary_prompt;
use super::{AIError, AIResult, Summarizer};
use crate::core::{AnthropicConfig, Secret};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude API provider.
pub struct ClaudeProvider {
    client: Client,
    api_key: Option<Secret>,
    endpoint: String,
    model: String,
    max_tokens: u32,
    project_name: String,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    ///
    /// A missing API key is only reported once a completion is requested.
    pub fn new(api_key: Option<Secret>, config: &AnthropicConfig) -> AIResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint: format!("{}/v1/messages", config.api_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            project_name: String::new(),
        })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the project name used in the summary prompt.
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    /// Send a single user-turn prompt and return the first text block.
    pub async fn complete(&self, prompt: &str) -> AIResult<String> {
        let api_key = self.api_key.as_ref().ok_or(AIError::MissingApiKey)?;

        let request = ClaudeRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message { role: "user", content: prompt }],
        };

        tracing::debug!(model = %self.model, max_tokens = self.max_tokens, "Requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AIError::Api { status, message });
        }

        let response: ClaudeResponse = response.json().await?;

        response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(AIError::NoResponse)
    }
}

#[async_trait]
impl Summarizer for ClaudeProvider {
    async fn summarize(&self, updates_text: &str) -> AIResult<String> {
        let prompt = build_summary_prompt(&self.project_name, updates_text);
        self.complete(&prompt).await
    }

    fn name(&self) -> &str {
        "claude"
    }
}

/// Claude API request structure.
#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

/// Message in a Claude request.
#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Claude API response structure.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

/// Content block in a Claude response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_without_key_fails_before_sending() {
        let provider = ClaudeProvider::new(None, &AnthropicConfig::default()).unwrap();
        let result = provider.complete("hello").await;
        assert!(matches!(result, Err(AIError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let config = AnthropicConfig::default();
        let provider = ClaudeProvider::new(Some(Secret::new("")), &config).unwrap();
        let result = provider.complete("hello").await;
        assert!(matches!(result, Err(AIError::MissingApiKey)));
        assert_eq!(provider.name(), "claude");
    }

    #[test]
    fn test_request_shape() {
        let request = ClaudeRequest {
            model: "claude-haiku-4-5-20251001",
            max_tokens: 4096,
            messages: vec![Message { role: "user", content: "summarize" }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "claude-haiku-4-5-20251001",
                "max_tokens": 4096,
                "messages": [{ "role": "user", "content": "summarize" }]
            })
        );
    }
}
