use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::constants::ERR_PROMPT_REQUIRED;
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::routes::validation::ValidJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// Forward a prompt to the configured generation backend
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(payload): ValidJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let prompt = payload
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation(ERR_PROMPT_REQUIRED.to_string()))?;

    tracing::debug!(
        "Generating for user {} via {} ({} chars)",
        user.user_id,
        state.backend.name(),
        prompt.len()
    );

    let generation = state.backend.generate(&prompt).await?;

    Ok(Json(GenerateResponse {
        text: generation.text,
    }))
}
