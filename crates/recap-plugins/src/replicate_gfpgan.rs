//! Replicate GFPGAN client for face restoration
//!
//! Sends a normalized JPEG to Replicate's hosted GFPGAN model and waits for the
//! prediction to finish. Model: https://replicate.com/tencentarc/gfpgan

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use recap_core::ReplicateConfig;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tokio::time::sleep;

use crate::restoration::{
    extract_result_url, RestorationClient, RestorationError, RestorationOutput, RestorationParams,
};

/// Replicate GFPGAN client
pub struct ReplicateGfpganClient {
    http_client: reqwest::Client,
    api_token: String,
    api_base: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl Debug for ReplicateGfpganClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ReplicateGfpganClient")
            .field("api_base", &self.api_base)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .finish()
    }
}

// Replicate API structures
#[derive(Debug, Serialize)]
struct CreatePredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    img: String, // data URI of the normalized JPEG
    version: &'a str,
    scale: u32,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    metrics: Option<PredictionMetrics>,
}

#[derive(Debug, Deserialize)]
struct PredictionMetrics {
    predict_time: Option<f64>,
}

impl ReplicateGfpganClient {
    pub fn new(
        api_token: impl Into<String>,
        config: &ReplicateConfig,
    ) -> Result<Self, RestorationError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RestorationError::Http(format!("Failed to create HTTP client for Replicate: {}", e))
            })?;

        Ok(Self {
            http_client,
            api_token: api_token.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_poll_attempts: config.max_poll_attempts,
        })
    }

    /// Build a client from config, or `None` when no API token is set
    pub fn from_config(config: &ReplicateConfig) -> Result<Option<Self>, RestorationError> {
        match config.api_token.as_deref() {
            Some(token) => Self::new(token, config).map(Some),
            None => Ok(None),
        }
    }

    fn data_uri(image: &[u8]) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(image))
    }

    /// Create a prediction on Replicate
    async fn create_prediction(
        &self,
        image: &[u8],
        params: &RestorationParams,
    ) -> Result<PredictionResponse, RestorationError> {
        let url = format!("{}/predictions", self.api_base);
        let body = CreatePredictionRequest {
            version: &params.model_version,
            input: PredictionInput {
                img: Self::data_uri(image),
                version: &params.version,
                scale: params.scale,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RestorationError::Http(e.to_string()))?;

        Self::parse_prediction(response).await
    }

    /// Get prediction status
    async fn get_prediction(
        &self,
        prediction_id: &str,
    ) -> Result<PredictionResponse, RestorationError> {
        let url = format!("{}/predictions/{}", self.api_base, prediction_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| RestorationError::Http(e.to_string()))?;

        Self::parse_prediction(response).await
    }

    async fn parse_prediction(
        response: reqwest::Response,
    ) -> Result<PredictionResponse, RestorationError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RestorationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RestorationError::InvalidResponse(e.to_string()))
    }

    /// Wait for prediction to reach a terminal state
    async fn wait_for_prediction(
        &self,
        prediction_id: &str,
    ) -> Result<PredictionResponse, RestorationError> {
        for attempt in 0..self.max_poll_attempts {
            let prediction = self.get_prediction(prediction_id).await?;

            match prediction.status.as_str() {
                "succeeded" => {
                    tracing::info!(
                        prediction_id = %prediction_id,
                        attempts = attempt + 1,
                        "Replicate prediction completed successfully"
                    );
                    return Ok(prediction);
                }
                "failed" => {
                    let message = match prediction.error {
                        Some(serde_json::Value::String(message)) => message,
                        Some(other) if !other.is_null() => other.to_string(),
                        _ => "Unknown error".to_string(),
                    };
                    return Err(RestorationError::PredictionFailed(message));
                }
                "canceled" => return Err(RestorationError::Canceled),
                "starting" | "processing" => {
                    tracing::debug!(
                        prediction_id = %prediction_id,
                        attempt = attempt + 1,
                        status = %prediction.status,
                        "Waiting for Replicate prediction to complete"
                    );
                    sleep(self.poll_interval).await;
                }
                _ => {
                    tracing::warn!(
                        prediction_id = %prediction_id,
                        status = %prediction.status,
                        "Unknown prediction status"
                    );
                    sleep(self.poll_interval).await;
                }
            }
        }

        Err(RestorationError::Timeout {
            attempts: self.max_poll_attempts,
        })
    }
}

#[async_trait]
impl RestorationClient for ReplicateGfpganClient {
    async fn restore(
        &self,
        image: Bytes,
        params: &RestorationParams,
    ) -> Result<RestorationOutput, RestorationError> {
        tracing::info!(
            model = %params.model,
            version = %params.version,
            scale = params.scale,
            size_bytes = image.len(),
            "Sending image to Replicate GFPGAN"
        );

        let created = self.create_prediction(&image, params).await?;
        tracing::debug!(prediction_id = %created.id, status = %created.status, "Prediction created");

        let prediction = self.wait_for_prediction(&created.id).await?;
        let result_url = extract_result_url(prediction.output.as_ref())?;

        Ok(RestorationOutput {
            result_url,
            prediction_id: Some(prediction.id),
            predict_time: prediction.metrics.and_then(|m| m.predict_time),
        })
    }

    fn name(&self) -> &str {
        "replicate_gfpgan"
    }
}
