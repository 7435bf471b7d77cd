//! HTTP request handlers for the REST API.
//!
//! Provider-level failures (missing credential, failed upstream call) are
//! not transport errors: they come back as normal 200 responses with the
//! error text in the reply body, exactly as the session produces them.
//! Only request-level problems map to error statuses, rendered as
//! `{"detail": ...}` bodies.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use parley_core::{ChatTurn, TurnOverrides};

use super::AppState;

/// Build all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/messages", get(messages))
        .route("/models", get(models))
        .route("/reset", post(reset))
        .route("/health", get(health))
}

/// An error rendered as an HTTP status with a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Body of a `POST /chat` request. Optional fields override the sticky
/// session settings for this and subsequent turns.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// The user message (required, non-empty).
    pub message: String,
    /// Optional model override.
    #[serde(default)]
    pub model: Option<String>,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Optional provider override ("openai" or "claude").
    #[serde(default)]
    pub provider: Option<String>,
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatTurn>, ApiError> {
    if body.message.is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }

    let overrides = TurnOverrides {
        model: body.model,
        system_prompt: body.system_prompt,
        provider: body.provider,
    };

    let mut session = state.session.lock().await;
    let turn = session.send_message(&body.message, overrides).await;
    Ok(Json(turn))
}

async fn messages(State(state): State<AppState>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    Json(json!({ "messages": session.messages() }))
}

/// Query parameters for `GET /models`.
#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    /// Overwrites the sticky provider before listing, when supplied.
    #[serde(default)]
    pub provider: Option<String>,
}

async fn models(
    State(state): State<AppState>,
    Query(query): Query<ModelsQuery>,
) -> Json<serde_json::Value> {
    let mut session = state.session.lock().await;
    match session.list_models(query.provider.as_deref()).await {
        Ok(models) => Json(json!({ "models": models })),
        Err(e) => Json(json!({ "models": { "error": e.to_string() } })),
    }
}

async fn reset(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(json!({ "status": "conversation reset", "messages": [] }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
