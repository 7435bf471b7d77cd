//! Claude-style provider implementation.
//!
//! [`ClaudeProvider`] talks to the Anthropic messages API, which differs
//! from the chat-completions format in three ways: the system prompt is a
//! top-level field rather than a transcript entry, the message list may
//! only contain user/assistant roles, and `max_tokens` is mandatory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use parley_types::{Message, Role, DEFAULT_CLAUDE_MODEL};

use crate::error::{ProviderError, Result};
use crate::provider::{ChatProvider, CompletionSettings, ModelEntry};

/// Production endpoint for the messages API.
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// API version header required by the messages API.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The messages API rejects requests without `max_tokens`.
const MAX_TOKENS: u32 = 1024;

/// The fixed model set returned by `list_models`. The messages API has no
/// live listing endpoint.
const KNOWN_MODELS: [&str; 3] = [
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

/// An LLM provider backed by the Anthropic messages API.
pub struct ClaudeProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ClaudeProvider {
    /// Create a provider against the production endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, ANTHROPIC_BASE_URL.into())
    }

    /// Create a provider against an explicit base URL (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    fn messages_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/messages")
    }
}

/// Substitute the fixed default when the configured model is not a
/// Claude-family identifier (the sticky model may still name a GPT model
/// after a provider switch).
fn resolve_model(model: &str) -> &str {
    if model.contains("claude") {
        model
    } else {
        DEFAULT_CLAUDE_MODEL
    }
}

#[async_trait]
impl ChatProvider for ClaudeProvider {
    fn display_name(&self) -> &'static str {
        "Claude"
    }

    async fn complete(
        &self,
        transcript: &[Message],
        settings: &CompletionSettings<'_>,
    ) -> Result<String> {
        // Only user/assistant entries go in the message list.
        let messages: Vec<WireMessage<'_>> = transcript
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let model = resolve_model(settings.model);
        let request = MessagesRequest {
            model,
            max_tokens: MAX_TOKENS,
            system: settings.system_prompt,
            messages,
        };

        debug!(
            provider = "claude",
            model = %model,
            messages = transcript.len(),
            "sending messages request"
        );

        let response = self
            .http
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_error_message(&body).unwrap_or(body);
            return Err(ProviderError::RequestFailed(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;

        reply
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| ProviderError::InvalidResponse("no content blocks in response".into()))
    }

    /// Fixed hardcoded model set; no live lookup exists upstream.
    async fn list_models(&self) -> Result<Vec<ModelEntry>> {
        Ok(KNOWN_MODELS.iter().copied().map(ModelEntry::new).collect())
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Extract the message from an error body (`{"error": {"message": "..."}}`).
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
}

impl std::fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}
