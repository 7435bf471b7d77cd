//! Provider error types for parley-llm.
//!
//! All provider operations return [`Result<T>`] which uses [`ProviderError`]
//! as the error type. No variant is retryable: every call is attempted
//! exactly once, and the routing layer converts failures into displayable
//! reply text.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider has no credential configured. Carries the provider's
    /// display name (e.g. "OpenAI", "Claude").
    #[error("{0} API key not configured")]
    NotConfigured(String),

    /// The HTTP request to the provider failed or returned an error status.
    #[error("{0}")]
    RequestFailed(String),

    /// The provider returned a response that could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An HTTP-level error from reqwest.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_configured() {
        let err = ProviderError::NotConfigured("OpenAI".into());
        assert_eq!(err.to_string(), "OpenAI API key not configured");
    }

    #[test]
    fn display_request_failed() {
        let err = ProviderError::RequestFailed("HTTP 500: upstream down".into());
        assert_eq!(err.to_string(), "HTTP 500: upstream down");
    }

    #[test]
    fn display_invalid_response() {
        let err = ProviderError::InvalidResponse("no choices in response".into());
        assert_eq!(err.to_string(), "invalid response: no choices in response");
    }

    #[test]
    fn json_error_from_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let provider_err: ProviderError = serde_err.into();
        assert!(provider_err.to_string().starts_with("json error:"));
    }
}
