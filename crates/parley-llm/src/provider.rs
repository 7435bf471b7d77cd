//! The core [`ChatProvider`] trait and the closed [`ProviderKind`] set.
//!
//! All providers implement [`ChatProvider`], which offers a `complete`
//! method for one conversation turn and a `list_models` method for model
//! discovery. Implementations handle the protocol details of a specific
//! provider API (authentication, request shape, response parsing).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parley_types::Message;

use crate::error::Result;

/// The closed set of providers a conversation can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// The OpenAI-style chat-completions provider.
    OpenAi,
    /// The Claude-style messages provider.
    Claude,
}

impl ProviderKind {
    /// Parse a provider string from a request.
    ///
    /// Matching is case-insensitive; `"claude"` selects the Claude path
    /// and any other value falls through to the OpenAI path, so parsing
    /// never fails and every value maps to exactly one dispatch path.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("claude") {
            ProviderKind::Claude
        } else {
            ProviderKind::OpenAi
        }
    }

    /// The lowercase identifier used in requests and config.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Claude => "claude",
        }
    }

    /// The human-readable name used in user-visible error replies.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Claude => "Claude",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-turn settings a provider needs to build its request.
///
/// Borrowed from the session's sticky settings; providers only read them.
#[derive(Debug, Clone, Copy)]
pub struct CompletionSettings<'a> {
    /// The model identifier requested for this turn.
    pub model: &'a str,
    /// The system prompt framing the conversation.
    pub system_prompt: &'a str,
}

/// A model identifier as returned by `list_models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// The provider's model id (e.g. "gpt-4o").
    pub id: String,
}

impl ModelEntry {
    /// Create an entry from a model id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A provider that can execute one conversation turn and list its models.
///
/// # Errors
///
/// `complete` returns [`ProviderError`](crate::error::ProviderError) on
/// network failures, error statuses, or unparseable responses. The routing
/// layer converts these into displayable reply strings rather than letting
/// them escape to the transport.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name (e.g. "OpenAI", "Claude").
    fn display_name(&self) -> &'static str;

    /// Send the full transcript to the provider and return the reply text.
    async fn complete(
        &self,
        transcript: &[Message],
        settings: &CompletionSettings<'_>,
    ) -> Result<String>;

    /// List the models available on this provider.
    async fn list_models(&self) -> Result<Vec<ModelEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_claude_case_insensitive() {
        assert_eq!(ProviderKind::parse("claude"), ProviderKind::Claude);
        assert_eq!(ProviderKind::parse("Claude"), ProviderKind::Claude);
        assert_eq!(ProviderKind::parse("CLAUDE"), ProviderKind::Claude);
    }

    #[test]
    fn parse_anything_else_is_openai() {
        assert_eq!(ProviderKind::parse("openai"), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::parse("gpt"), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::parse(""), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::parse("mistral"), ProviderKind::OpenAi);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::OpenAi).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::Claude).unwrap(),
            "\"claude\""
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(ProviderKind::OpenAi.display_name(), "OpenAI");
        assert_eq!(ProviderKind::Claude.display_name(), "Claude");
    }

    #[test]
    fn model_entry_serializes_as_id_object() {
        let entry = ModelEntry::new("gpt-4o");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"id":"gpt-4o"}"#);
    }
}
