//! Shared leaf types for parley.
//!
//! This crate sits at the bottom of the workspace and has no dependencies
//! on other parley crates. It provides:
//!
//! - [`Message`] and [`Role`] -- the conversation transcript entry types
//! - [`AppConfig`] -- process configuration loaded once from the environment

pub mod config;
pub mod message;

pub use config::{
    AppConfig, DEFAULT_CHAT_MODEL, DEFAULT_CLAUDE_MODEL, DEFAULT_SYSTEM_PROMPT,
};
pub use message::{Message, Role};
