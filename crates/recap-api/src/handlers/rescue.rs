//! Photo rescue handler

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use recap_core::AppError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct RescueSettings {
    pub rotation_fixed: bool,
    pub model: String,
    pub model_version: String,
    pub version: String,
    pub scale: u32,
    pub input_width: u32,
    pub input_height: u32,
    pub output_width: u32,
    pub output_height: u32,
}

#[derive(Debug, Serialize)]
pub struct RescueResponse {
    pub success: bool,
    pub message: String,
    pub result_url: String,
    pub settings: RescueSettings,
}

/// Normalize the uploaded photo and send it for restoration
pub async fn rescue_photo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let client = state.restoration.clone().ok_or_else(|| {
        AppError::Configuration(
            "Replicate API token is not configured. Set REPLICATE_API_TOKEN.".to_string(),
        )
    })?;

    let upload = extract_multipart_file(multipart).await?;
    tracing::info!(
        filename = %upload.filename,
        content_type = %upload.content_type,
        size_bytes = upload.data.len(),
        "Photo upload received"
    );

    let normalizer = state.normalizer;
    let data = upload.data;
    let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(&data))
        .await
        .map_err(|e| AppError::Internal(format!("Image processing task failed: {}", e)))??;
    let report = normalized.report;

    let params = &state.restoration_params;
    let output = client.restore(normalized.data, params).await?;

    tracing::info!(
        client = client.name(),
        result_url = %output.result_url,
        prediction_id = ?output.prediction_id,
        predict_time = ?output.predict_time,
        "Photo rescued"
    );

    Ok(Json(RescueResponse {
        success: true,
        message: "Photo restoration complete".to_string(),
        result_url: output.result_url,
        settings: RescueSettings {
            rotation_fixed: true,
            model: params.model.clone(),
            model_version: params.model_version.clone(),
            version: params.version.clone(),
            scale: params.scale,
            input_width: report.original_width,
            input_height: report.original_height,
            output_width: report.output_width,
            output_height: report.output_height,
        },
    }))
}
