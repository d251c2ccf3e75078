use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::Result;
use crate::models::ChatReply;
use crate::routes::validation::ValidJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Unauthenticated chat with the mock responder
///
/// Empty or missing content matches no category and gets a generic reply.
pub async fn chat(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ChatRequest>,
) -> Result<Json<ChatReply>> {
    tracing::debug!(
        "Chat request ({}): {} chars",
        payload.kind.as_deref().unwrap_or("user"),
        payload.content.len()
    );

    Ok(Json(state.mock.respond(&payload.content).await))
}
