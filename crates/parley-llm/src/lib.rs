//! LLM provider abstraction for parley.
//!
//! This crate provides a unified interface for calling the two external
//! chat providers parley relays to:
//!
//! - [`ChatProvider`] trait defines the completion and model-listing interface
//! - [`OpenAiProvider`] implements it for the OpenAI chat-completions API
//! - [`ClaudeProvider`] implements it for the Anthropic messages API
//! - [`ProviderKind`] is the closed set of dispatchable provider variants
//!
//! Adding a provider means adding a variant and an implementation, not
//! editing conditionals elsewhere.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use parley_llm::{ChatProvider, CompletionSettings, OpenAiProvider};
//! use parley_types::Message;
//!
//! let provider = OpenAiProvider::new("sk-...".into());
//! let transcript = vec![Message::user("What is Rust?")];
//! let settings = CompletionSettings {
//!     model: "gpt-4o",
//!     system_prompt: "You are a helpful assistant.",
//! };
//! let reply = provider.complete(&transcript, &settings).await?;
//! ```

pub mod claude;
pub mod error;
pub mod openai;
pub mod provider;

pub use claude::ClaudeProvider;
pub use error::{ProviderError, Result};
pub use openai::OpenAiProvider;
pub use provider::{ChatProvider, CompletionSettings, ModelEntry, ProviderKind};
