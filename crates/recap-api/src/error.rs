//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; domain errors from the
//! pipeline and the restoration client convert into `AppError` and render as a JSON
//! `ErrorResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recap_core::{AppError, ErrorMetadata, LogLevel};
use recap_plugins::RestorationError;
use recap_processing::NormalizeError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Copy of a rendered error body, attached to the response as an extension
/// so outer layers can rewrite it without re-parsing JSON.
#[derive(Debug, Clone)]
pub struct RenderedError(pub ErrorResponse);

impl RenderedError {
    /// Same error without `details` and `error_type`
    pub fn redacted(self) -> ErrorResponse {
        ErrorResponse {
            details: None,
            error_type: None,
            ..self.0
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
///
/// Needed because of the orphan rule: `AppError` lives in recap-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<NormalizeError> for HttpAppError {
    fn from(err: NormalizeError) -> Self {
        let app = match err {
            NormalizeError::Decode(msg) => AppError::Decode(msg),
            NormalizeError::Encode(msg) => AppError::Encode(msg),
        };
        HttpAppError(app)
    }
}

impl From<RestorationError> for HttpAppError {
    fn from(err: RestorationError) -> Self {
        HttpAppError(AppError::UpstreamInference(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl HttpAppError {
    fn to_error_response(&self, include_details: bool) -> ErrorResponse {
        let app_error = &self.0;
        let (details, error_type) = if include_details {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        } else {
            (None, None)
        };

        ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        // Sensitive errors never carry details; production stripping happens in
        // the error_details middleware
        let body = self.to_error_response(!self.0.is_sensitive());

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(RenderedError(body));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_normalize_decode_error() {
        let HttpAppError(app_err) = NormalizeError::Decode("unknown format".to_string()).into();
        match app_err {
            AppError::Decode(msg) => assert_eq!(msg, "unknown format"),
            _ => panic!("Expected Decode variant"),
        }
    }

    #[test]
    fn test_from_normalize_encode_error() {
        let HttpAppError(app_err) = NormalizeError::Encode("out of memory".to_string()).into();
        assert!(matches!(app_err, AppError::Encode(_)));
    }

    #[test]
    fn test_from_restoration_error_carries_upstream_text() {
        let err = RestorationError::Api {
            status: 422,
            message: "Invalid version".to_string(),
        };
        let HttpAppError(app_err) = err.into();
        match app_err {
            AppError::UpstreamInference(msg) => {
                assert!(msg.contains("422"));
                assert!(msg.contains("Invalid version"));
            }
            _ => panic!("Expected UpstreamInference variant"),
        }
    }

    #[test]
    fn test_empty_output_maps_to_upstream() {
        let HttpAppError(app_err) = RestorationError::EmptyOutput.into();
        assert_eq!(app_err.error_code(), "UPSTREAM_INFERENCE_ERROR");
        assert_eq!(app_err.http_status_code(), 500);
    }

    #[test]
    fn test_error_response_hides_sensitive_details() {
        let err = HttpAppError(AppError::Internal("db password leaked".to_string()));
        let body = err.to_error_response(false);
        assert_eq!(body.error, "Internal server error");
        assert!(body.details.is_none());
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_response_with_details() {
        let err = HttpAppError(AppError::Decode("bad header".to_string()));
        let body = err.to_error_response(true);
        assert!(body.error.contains("bad header"));
        assert_eq!(body.error_type.as_deref(), Some("Decode"));
        assert_eq!(body.code, "DECODE_ERROR");
        assert!(!body.recoverable);
    }

    #[test]
    fn test_into_response_status() {
        let response = HttpAppError(AppError::InvalidInput("No file provided".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            HttpAppError(AppError::Configuration("missing token".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_attaches_rendered_error() {
        let response = HttpAppError(AppError::Decode("bad header".to_string())).into_response();
        let rendered = response
            .extensions()
            .get::<RenderedError>()
            .cloned()
            .expect("rendered error extension");
        assert_eq!(rendered.0.code, "DECODE_ERROR");
        assert!(rendered.0.details.is_some());

        let redacted = rendered.redacted();
        assert!(redacted.details.is_none());
        assert!(redacted.error_type.is_none());
        assert_eq!(redacted.code, "DECODE_ERROR");
    }

    #[test]
    fn test_sensitive_error_renders_without_details() {
        let response = HttpAppError(AppError::Internal("secret".to_string())).into_response();
        let rendered = response.extensions().get::<RenderedError>().cloned().unwrap();
        assert!(rendered.0.details.is_none());
    }
}
