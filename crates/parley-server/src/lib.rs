//! HTTP API surface for parley.
//!
//! Exposes the chat session as a small REST API:
//!
//! - `POST /chat` -- send a message, get the reply and updated transcript
//! - `GET /messages` -- the current transcript
//! - `GET /models` -- models for the active (or supplied) provider
//! - `POST /reset` -- clear the transcript
//! - `GET /health` -- liveness check
//!
//! All session operations serialize behind one mutex, so concurrent
//! requests are fully ordered against the single shared conversation.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use parley_core::ChatSession;

/// Shared state accessible by all API handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single shared conversation session.
    pub session: Arc<Mutex<ChatSession>>,
}

impl AppState {
    /// Wrap a session for sharing across handlers.
    pub fn new(session: ChatSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Build the API router with all routes and middleware layers.
///
/// CORS is permissive: the API is meant to be called directly from a
/// browser frontend and carries no credentials of its own.
pub fn build_router(state: AppState) -> Router {
    handlers::api_routes()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
