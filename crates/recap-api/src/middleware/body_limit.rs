//! Early rejection of declared-oversized uploads
//!
//! `RequestBodyLimitLayer` answers an oversized `Content-Length` with a plain-text 413.
//! This layer sits outside it and turns the same case into the JSON error envelope.
//! Chunked bodies without a length still fall through to the streaming limit, which
//! surfaces as a multipart error in the handler.

use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::{IntoResponse, Response},
};
use recap_core::AppError;

pub async fn reject_oversized_body(
    State(max_bytes): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if let Some(length) = declared {
        if length > max_bytes as u64 {
            tracing::debug!(
                content_length = length,
                max_bytes = max_bytes,
                "Rejecting upload over the size limit"
            );
            return HttpAppError(AppError::PayloadTooLarge(format!(
                "Upload is {} bytes; the limit is {} bytes",
                length, max_bytes
            )))
            .into_response();
        }
    }

    next.run(request).await
}
