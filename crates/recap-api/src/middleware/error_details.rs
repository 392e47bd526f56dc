//! Production error redaction
//!
//! Error bodies are rendered with diagnostic `details` and `error_type`. In production
//! this layer swaps them for the redacted form before they leave the service.

use crate::error::RenderedError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Strip diagnostic fields from JSON error bodies when `production` is set
pub async fn hide_error_details(
    State(production): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if !production {
        return response;
    }

    let Some(rendered) = response.extensions_mut().remove::<RenderedError>() else {
        return response;
    };
    if rendered.0.details.is_none() && rendered.0.error_type.is_none() {
        return response;
    }

    (response.status(), Json(rendered.redacted())).into_response()
}
