//! OpenAI-style provider implementation.
//!
//! [`OpenAiProvider`] talks to the chat-completions API: the request carries
//! a system entry followed by the full transcript, and the reply is the
//! first choice's message content. Model listing is live with a fixed
//! fallback set when the call fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use parley_types::Message;

use crate::error::{ProviderError, Result};
use crate::provider::{ChatProvider, CompletionSettings, ModelEntry};

/// Production endpoint for the chat-completions API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Models returned when the live listing call fails.
const FALLBACK_MODELS: [&str; 3] = ["gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"];

/// An LLM provider backed by the OpenAI chat-completions API.
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a provider against the production endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENAI_BASE_URL.into())
    }

    /// Create a provider against an explicit base URL (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    fn models_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/models")
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn display_name(&self) -> &'static str {
        "OpenAI"
    }

    async fn complete(
        &self,
        transcript: &[Message],
        settings: &CompletionSettings<'_>,
    ) -> Result<String> {
        // System prompt first, then every stored message in order.
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: settings.system_prompt,
        });
        messages.extend(transcript.iter().map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        let request = ChatCompletionRequest {
            model: settings.model,
            messages,
        };

        debug!(
            provider = "openai",
            model = %settings.model,
            messages = transcript.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("no choices in response".into()))
    }

    /// Live model listing, filtered to chat models.
    ///
    /// Any listing failure falls back to a fixed set of well-known models
    /// instead of surfacing an error.
    async fn list_models(&self) -> Result<Vec<ModelEntry>> {
        match self.try_list_models().await {
            Ok(models) => Ok(models),
            Err(e) => {
                warn!(provider = "openai", error = %e, "model listing failed, using fallback set");
                Ok(FALLBACK_MODELS.iter().copied().map(ModelEntry::new).collect())
            }
        }
    }
}

impl OpenAiProvider {
    async fn try_list_models(&self) -> Result<Vec<ModelEntry>> {
        let response = self
            .http
            .get(self.models_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let listing: ModelListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse listing: {e}")))?;

        Ok(listing
            .data
            .into_iter()
            .filter(|m| m.id.to_lowercase().contains("gpt"))
            .collect())
    }
}

/// A transcript entry in the provider's wire vocabulary.
#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

/// Extract a human-readable message from a JSON error body
/// (`{"error": {"message": "..."}}` or `{"error": "..."}`).
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| {
        v.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .or_else(|| v.as_str().map(String::from))
    })
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}
