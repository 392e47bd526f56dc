//! Restoration client abstraction
//!
//! A restoration client takes one normalized JPEG and returns a URL where the
//! restored photo can be fetched. Nothing is stored locally.

use async_trait::async_trait;
use bytes::Bytes;
use recap_core::ReplicateConfig;
use serde::Serialize;
use serde_json::Value;

/// Parameters sent with every restoration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestorationParams {
    /// Model slug, reported back to callers
    pub model: String,
    /// Exact model version hash the prediction runs on
    pub model_version: String,
    /// GFPGAN weights release
    pub version: String,
    /// Output upscale factor
    pub scale: u32,
}

impl RestorationParams {
    pub fn from_config(config: &ReplicateConfig) -> Self {
        Self {
            model: config.model.clone(),
            model_version: config.model_version.clone(),
            version: config.gfpgan_version.clone(),
            scale: config.scale,
        }
    }
}

impl Default for RestorationParams {
    fn default() -> Self {
        Self::from_config(&ReplicateConfig::default())
    }
}

/// Successful restoration
#[derive(Debug, Clone, PartialEq)]
pub struct RestorationOutput {
    pub result_url: String,
    pub prediction_id: Option<String>,
    pub predict_time: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum RestorationError {
    #[error("Request to restoration service failed: {0}")]
    Http(String),

    #[error("Restoration service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Prediction was canceled")]
    Canceled,

    #[error("Prediction did not finish after {attempts} polls")]
    Timeout { attempts: u32 },

    #[error("Restoration service returned no output")]
    EmptyOutput,

    #[error("Unexpected response from restoration service: {0}")]
    InvalidResponse(String),
}

/// Anything that can turn a normalized photo into a restored-photo URL
#[async_trait]
pub trait RestorationClient: Send + Sync {
    async fn restore(
        &self,
        image: Bytes,
        params: &RestorationParams,
    ) -> Result<RestorationOutput, RestorationError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Pull the result URL out of a prediction's `output` field.
///
/// A plain string is the URL. A list yields its first element when that is a string.
/// Anything else, including an empty string or list, is `EmptyOutput`.
pub fn extract_result_url(output: Option<&Value>) -> Result<String, RestorationError> {
    let url = match output {
        Some(Value::String(url)) => Some(url.as_str()),
        Some(Value::Array(items)) => items.first().and_then(Value::as_str),
        _ => None,
    };

    match url.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(RestorationError::EmptyOutput),
    }
}
