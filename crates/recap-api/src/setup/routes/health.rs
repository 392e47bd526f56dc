//! Service status handlers

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use recap_processing::image::crop::CENTER_CROP_RATIO;
use recap_processing::image::resize::{MAX_PIXELS, UPSTREAM_PIXEL_LIMIT};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub(super) struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub features: Vec<&'static str>,
}

#[derive(Serialize)]
pub(super) struct PipelineFeatures {
    pub exif_rotation: bool,
    pub center_crop: bool,
    pub pixel_budget: bool,
    pub max_pixels: u64,
    /// Input size the hosted model itself refuses above
    pub upstream_pixel_limit: u64,
    pub crop_ratio: f64,
}

#[derive(Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: &'static str,
    pub replicate_api_key: &'static str,
    pub features: PipelineFeatures,
}

/// `GET /` - service banner
pub(super) async fn service_info() -> impl IntoResponse {
    Json(ServiceInfo {
        service: crate::setup::SERVICE_NAME,
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        features: vec![
            "EXIF rotation fix",
            "Center crop (85%)",
            "Pixel budget resize",
            "GFPGAN face restoration",
        ],
    })
}

/// `GET /health` - liveness plus whether the inference token is set
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let replicate_api_key = if state.config.has_replicate_token() {
        "configured"
    } else {
        "missing"
    };

    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy",
            replicate_api_key,
            features: PipelineFeatures {
                exif_rotation: true,
                center_crop: true,
                pixel_budget: true,
                max_pixels: MAX_PIXELS,
                upstream_pixel_limit: UPSTREAM_PIXEL_LIMIT,
                crop_ratio: CENTER_CROP_RATIO,
            },
        }),
    )
}
