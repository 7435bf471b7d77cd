//! Conversation session and provider routing for parley.
//!
//! [`ChatSession`] owns the in-memory transcript and the sticky
//! [`SessionSettings`], and dispatches each turn to the provider selected
//! by those settings. Provider failures never escape: they are absorbed
//! into the conversation as displayable assistant replies.

pub mod session;

pub use session::{ChatSession, ChatTurn, SessionSettings, TurnOverrides};
