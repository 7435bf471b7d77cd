//! Process configuration, loaded once at startup from the environment.
//!
//! Credentials are never mutated after loading; availability of a provider
//! is derived from a non-empty check on its key.

/// Default model for the OpenAI-style provider.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Default model for the Claude-style provider.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-haiku-20241022";

/// Default system prompt applied to every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Process-wide configuration.
///
/// Loaded once via [`AppConfig::from_env`] and shared read-only from then
/// on. An empty-string credential counts as absent.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the OpenAI-style provider, if configured.
    pub openai_api_key: Option<String>,
    /// API key for the Claude-style provider, if configured.
    pub anthropic_api_key: Option<String>,
    /// Enable debug behavior in the server.
    pub debug: bool,
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `DEBUG`, `HOST`, and
    /// `PORT`. Missing or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an explicit variable lookup.
    ///
    /// `from_env` is a thin wrapper over this; tests supply their own
    /// lookup to avoid touching the real environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            debug: lookup("DEBUG")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(true),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }

    /// Whether the OpenAI-style provider has a credential.
    pub fn openai_available(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Whether the Claude-style provider has a credential.
    pub fn claude_available(&self) -> bool {
        self.anthropic_api_key.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
