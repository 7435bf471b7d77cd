//! The chat session: transcript, sticky settings, and provider dispatch.
//!
//! A [`ChatSession`] is an explicit object owned by the surrounding server
//! (one shared instance for the whole process, matching the product's
//! single-conversation behavior). The transcript is append-only except for
//! [`ChatSession::reset`], which clears it atomically.

use serde::Serialize;
use tracing::{debug, info};

use parley_llm::{
    ChatProvider, ClaudeProvider, CompletionSettings, ModelEntry, OpenAiProvider, ProviderError,
    ProviderKind,
};
use parley_types::{AppConfig, Message, DEFAULT_CHAT_MODEL, DEFAULT_SYSTEM_PROMPT};

/// Sticky per-session defaults, overridable on each request.
///
/// A value supplied with a request replaces the stored one and stays in
/// effect for subsequent requests that omit it.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Model identifier sent to the active provider.
    pub model: String,
    /// System prompt framing the conversation.
    pub system_prompt: String,
    /// Which provider path the next turn dispatches to.
    pub provider: ProviderKind,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            provider: ProviderKind::OpenAi,
        }
    }
}

/// Optional per-request overrides of the sticky settings.
///
/// Empty strings are treated as absent, so a client sending `""` does not
/// clobber a stored value.
#[derive(Debug, Clone, Default)]
pub struct TurnOverrides {
    /// Replace the sticky model.
    pub model: Option<String>,
    /// Replace the sticky system prompt.
    pub system_prompt: Option<String>,
    /// Replace the sticky provider (parsed case-insensitively).
    pub provider: Option<String>,
}

/// The result of one conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    /// The assistant reply (or an absorbed error string).
    pub response: String,
    /// Snapshot of the full transcript after this turn.
    pub messages: Vec<Message>,
}

/// A conversation session routing turns to one of two providers.
///
/// Providers are constructed once from the credentials present at startup;
/// a missing credential leaves its slot empty and every turn dispatched to
/// it yields a "not configured" reply instead of an error.
pub struct ChatSession {
    transcript: Vec<Message>,
    settings: SessionSettings,
    openai: Option<OpenAiProvider>,
    claude: Option<ClaudeProvider>,
}

impl ChatSession {
    /// Build a session from the process configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_providers(
            config.openai_api_key.clone().map(OpenAiProvider::new),
            config.anthropic_api_key.clone().map(ClaudeProvider::new),
        )
    }

    /// Build a session from explicit provider instances.
    ///
    /// Tests use this to point providers at mock servers; `None` models a
    /// missing credential.
    pub fn with_providers(
        openai: Option<OpenAiProvider>,
        claude: Option<ClaudeProvider>,
    ) -> Self {
        Self {
            transcript: Vec::new(),
            settings: SessionSettings::default(),
            openai,
            claude,
        }
    }

    /// The current sticky settings.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Read-only snapshot of the transcript in append order.
    pub fn messages(&self) -> &[Message] {
        &self.transcript
    }

    /// Clear the transcript. Idempotent; settings are retained.
    pub fn reset(&mut self) {
        info!(discarded = self.transcript.len(), "conversation reset");
        self.transcript.clear();
    }

    /// Send one user message and append the provider's reply.
    ///
    /// Applies any supplied overrides to the sticky settings, appends the
    /// user entry, dispatches to the active provider, and appends the reply
    /// as the assistant entry. A missing credential or a failed provider
    /// call produces an error-text reply; neither is a failure of this
    /// operation, so the transcript always grows by exactly two entries.
    pub async fn send_message(&mut self, text: &str, overrides: TurnOverrides) -> ChatTurn {
        self.apply_overrides(overrides);
        self.transcript.push(Message::user(text));

        let reply = self.dispatch().await;
        self.transcript.push(Message::assistant(reply.clone()));

        ChatTurn {
            response: reply,
            messages: self.transcript.clone(),
        }
    }

    /// List models for the active provider.
    ///
    /// A supplied override updates the sticky provider before listing, the
    /// same way `/chat` overrides do. A missing credential surfaces as
    /// [`ProviderError::NotConfigured`]; the OpenAI path's live-listing
    /// failures are handled inside the provider and never reach here.
    pub async fn list_models(
        &mut self,
        provider_override: Option<&str>,
    ) -> Result<Vec<ModelEntry>, ProviderError> {
        if let Some(value) = provider_override.filter(|v| !v.is_empty()) {
            self.settings.provider = ProviderKind::parse(value);
        }

        match self.active_provider() {
            Some(provider) => provider.list_models().await,
            None => Err(ProviderError::NotConfigured(
                self.settings.provider.display_name().into(),
            )),
        }
    }

    fn apply_overrides(&mut self, overrides: TurnOverrides) {
        if let Some(model) = overrides.model.filter(|v| !v.is_empty()) {
            debug!(model = %model, "model override applied");
            self.settings.model = model;
        }
        if let Some(prompt) = overrides.system_prompt.filter(|v| !v.is_empty()) {
            self.settings.system_prompt = prompt;
        }
        if let Some(provider) = overrides.provider.filter(|v| !v.is_empty()) {
            let kind = ProviderKind::parse(&provider);
            debug!(provider = %kind, "provider override applied");
            self.settings.provider = kind;
        }
    }

    fn active_provider(&self) -> Option<&dyn ChatProvider> {
        match self.settings.provider {
            ProviderKind::OpenAi => self.openai.as_ref().map(|p| p as &dyn ChatProvider),
            ProviderKind::Claude => self.claude.as_ref().map(|p| p as &dyn ChatProvider),
        }
    }

    /// Dispatch the current transcript to the active provider, converting
    /// every anticipated failure into displayable reply text.
    async fn dispatch(&self) -> String {
        let kind = self.settings.provider;
        let Some(provider) = self.active_provider() else {
            return format!("Error: {} API key not configured", kind.display_name());
        };

        let completion_settings = CompletionSettings {
            model: &self.settings.model,
            system_prompt: &self.settings.system_prompt,
        };

        match provider.complete(&self.transcript, &completion_settings).await {
            Ok(text) => text,
            Err(e) => format!("Error calling {} API: {e}", provider.display_name()),
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("messages", &self.transcript.len())
            .field("settings", &self.settings)
            .field("openai", &self.openai.is_some())
            .field("claude", &self.claude.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::Role;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bare_session() -> ChatSession {
        ChatSession::with_providers(None, None)
    }

    async fn openai_session(server: &MockServer) -> ChatSession {
        ChatSession::with_providers(
            Some(OpenAiProvider::with_base_url("sk-test".into(), server.uri())),
            None,
        )
    }

    fn mock_completion(reply: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": reply},
                "finish_reason": "stop"
            }]
        }))
    }

    #[tokio::test]
    async fn transcript_grows_two_entries_per_turn() {
        let mut session = bare_session();
        for n in 1..=3 {
            session.send_message("hi", TurnOverrides::default()).await;
            assert_eq!(session.messages().len(), 2 * n);
        }
    }

    #[tokio::test]
    async fn missing_openai_credential_yields_error_reply() {
        let mut session = bare_session();
        let turn = session.send_message("hi", TurnOverrides::default()).await;
        assert_eq!(turn.response, "Error: OpenAI API key not configured");
        assert_eq!(turn.messages.len(), 2);
        assert_eq!(turn.messages[0].role, Role::User);
        assert_eq!(turn.messages[1].role, Role::Assistant);
        assert_eq!(turn.messages[1].content, turn.response);
    }

    #[tokio::test]
    async fn missing_claude_credential_yields_error_reply() {
        let mut session = bare_session();
        let turn = session
            .send_message(
                "hi",
                TurnOverrides {
                    provider: Some("claude".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(turn.response, "Error: Claude API key not configured");
    }

    #[tokio::test]
    async fn provider_override_is_sticky() {
        let mut session = bare_session();
        session
            .send_message(
                "hi",
                TurnOverrides {
                    provider: Some("claude".into()),
                    ..Default::default()
                },
            )
            .await;

        // No override on the second call: still the Claude path.
        let turn = session.send_message("again", TurnOverrides::default()).await;
        assert_eq!(turn.response, "Error: Claude API key not configured");
    }

    #[tokio::test]
    async fn model_override_is_sticky() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4-turbo"})))
            .respond_with(mock_completion("ok"))
            .expect(2)
            .mount(&server)
            .await;

        let mut session = openai_session(&server).await;
        session
            .send_message(
                "hi",
                TurnOverrides {
                    model: Some("gpt-4-turbo".into()),
                    ..Default::default()
                },
            )
            .await;
        // Second call omits the model; the sticky value must be reused.
        session.send_message("there", TurnOverrides::default()).await;
    }

    #[tokio::test]
    async fn empty_override_strings_do_not_clobber() {
        let mut session = bare_session();
        session
            .send_message(
                "hi",
                TurnOverrides {
                    model: Some(String::new()),
                    system_prompt: Some(String::new()),
                    provider: Some(String::new()),
                },
            )
            .await;
        assert_eq!(session.settings().model, DEFAULT_CHAT_MODEL);
        assert_eq!(session.settings().system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(session.settings().provider, ProviderKind::OpenAi);
    }

    #[tokio::test]
    async fn reset_empties_transcript_and_is_idempotent() {
        let mut session = bare_session();
        session.send_message("hi", TurnOverrides::default()).await;
        assert!(!session.messages().is_empty());

        session.reset();
        assert!(session.messages().is_empty());
        session.reset();
        assert!(session.messages().is_empty());

        // Settings survive a reset.
        assert_eq!(session.settings().model, DEFAULT_CHAT_MODEL);
    }

    #[tokio::test]
    async fn provider_failure_is_absorbed_into_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"message": "upstream exploded"}
            })))
            .mount(&server)
            .await;

        let mut session = openai_session(&server).await;
        let turn = session.send_message("hi", TurnOverrides::default()).await;
        assert!(turn.response.starts_with("Error calling OpenAI API:"));
        assert!(turn.response.contains("upstream exploded"));
        assert_eq!(turn.messages.len(), 2);
    }

    #[tokio::test]
    async fn successful_turn_returns_reply_and_transcript() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(mock_completion("4"))
            .mount(&server)
            .await;

        let mut session = openai_session(&server).await;
        let turn = session
            .send_message(
                "2+2?",
                TurnOverrides {
                    provider: Some("openai".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(turn.response, "4");
        assert_eq!(turn.messages[0], Message::user("2+2?"));
        assert_eq!(turn.messages[1], Message::assistant("4"));
    }

    #[tokio::test]
    async fn list_models_without_credential_is_not_configured() {
        let mut session = bare_session();
        let err = session.list_models(None).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert_eq!(err.to_string(), "OpenAI API key not configured");
    }

    #[tokio::test]
    async fn list_models_override_updates_sticky_provider() {
        let mut session = bare_session();
        let err = session.list_models(Some("claude")).await.unwrap_err();
        assert_eq!(err.to_string(), "Claude API key not configured");
        assert_eq!(session.settings().provider, ProviderKind::Claude);
    }

    #[tokio::test]
    async fn claude_list_models_is_fixed_set() {
        let mut session =
            ChatSession::with_providers(None, Some(ClaudeProvider::new("sk-ant-test".into())));
        let models = session.list_models(Some("claude")).await.unwrap();
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "claude-3-opus-20240229",
                "claude-3-sonnet-20240229",
                "claude-3-haiku-20240307"
            ]
        );
    }
}
