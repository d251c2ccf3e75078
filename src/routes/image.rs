use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::MSG_IMAGE_ANALYZED;
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::routes::validation::{image_preview, parse_image_data_url, require_image_data, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(rename = "imageBase64")]
    pub image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub message: &'static str,
    pub analysis: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeImageResponse {
    pub success: bool,
    pub analysis: ImageAnalysis,
}

#[derive(Debug, Serialize)]
pub struct ImageAnalysis {
    pub result: String,
    pub metadata: ImageMetadata,
}

#[derive(Debug, Serialize)]
pub struct ImageMetadata {
    pub format: String,
    pub timestamp: String,
    #[serde(rename = "processingTime")]
    pub processing_time: Option<u64>,
}

/// Describe an uploaded image
///
/// Only a short prefix of the data URL reaches the backend, as text. The reply
/// is whatever the backend makes of that prefix.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(payload): ValidJson<ImageRequest>,
) -> Result<Json<UploadImageResponse>> {
    let image = require_image_data(payload.image_base64.as_deref())?;
    tracing::info!("Image upload from user {} ({} bytes)", user.user_id, image.len());

    let prompt = format!(
        "Analyze the following image data and provide a detailed description or insights: {}...",
        image_preview(image)
    );

    let generation = state
        .backend
        .generate(&prompt)
        .await
        .map_err(AppError::ImageAnalysisFailed)?;

    Ok(Json(UploadImageResponse {
        message: MSG_IMAGE_ANALYZED,
        analysis: generation.text,
    }))
}

/// Structured image analysis with format metadata
pub async fn analyze_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(payload): ValidJson<ImageRequest>,
) -> Result<Json<AnalyzeImageResponse>> {
    let image = require_image_data(payload.image_base64.as_deref())?;
    let parsed = parse_image_data_url(image)?;
    tracing::info!("Image analysis for user {} ({})", user.user_id, parsed.format);

    let prompt = format!(
        "Analyze this image and provide:\n\
         1. Main objects/subjects\n\
         2. Colors and composition\n\
         3. Any text content\n\
         4. Mood/atmosphere\n\
         5. Technical details (if relevant)\n\
         6. Potential use cases or recommendations\n\n\
         Image data (base64): {}...",
        image_preview(parsed.data)
    );

    let generation = state
        .backend
        .generate(&prompt)
        .await
        .map_err(AppError::ImageAnalysisFailed)?;

    Ok(Json(AnalyzeImageResponse {
        success: true,
        analysis: ImageAnalysis {
            result: generation.text,
            metadata: ImageMetadata {
                format: parsed.format.to_string(),
                timestamp: Utc::now().to_rfc3339(),
                processing_time: generation.total_duration,
            },
        },
    }))
}
