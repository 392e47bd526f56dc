//! Configuration module
//!
//! Configuration is read once at startup and passed explicitly to the components
//! that need it. Nothing outside this module reads the process environment.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

// Server defaults
const SERVER_PORT: u16 = 8000;
const SERVER_HOST: &str = "0.0.0.0";
const MAX_UPLOAD_SIZE_MB: usize = 20;
const HTTP_CONCURRENCY_LIMIT: usize = 64;
const LOG_FORMAT: &str = "pretty";

// Replicate defaults (GFPGAN face restoration model)
const REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";
const GFPGAN_MODEL: &str = "tencentarc/gfpgan";
const GFPGAN_MODEL_VERSION: &str =
    "0fbacf7afc6c144e5be9767cff80f25aff23e52b0708f17e20f9879b2f21516c";
const GFPGAN_VERSION: &str = "v1.4";
const GFPGAN_SCALE: u32 = 2;
const POLL_INTERVAL_MS: u64 = 1000;
const MAX_POLL_ATTEMPTS: u32 = 300;
const HTTP_TIMEOUT_SECS: u64 = 300;

/// HTTP server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_upload_size_bytes: usize,
    /// In-flight request cap; each rescue holds a decoded photo in memory
    pub concurrency_limit: usize,
    /// `pretty` or `json`
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: SERVER_HOST.to_string(),
            port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: LOG_FORMAT.to_string(),
        }
    }
}

/// Replicate inference configuration
#[derive(Clone)]
pub struct ReplicateConfig {
    /// API token. `None` keeps the server up but makes every rescue request fail fast.
    pub api_token: Option<String>,
    pub api_base: String,
    pub model: String,
    pub model_version: String,
    /// GFPGAN release passed as the model's own `version` input
    pub gfpgan_version: String,
    pub scale: u32,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub timeout_secs: u64,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            api_base: REPLICATE_API_BASE.to_string(),
            model: GFPGAN_MODEL.to_string(),
            model_version: GFPGAN_MODEL_VERSION.to_string(),
            gfpgan_version: GFPGAN_VERSION.to_string(),
            scale: GFPGAN_SCALE,
            poll_interval_ms: POLL_INTERVAL_MS,
            max_poll_attempts: MAX_POLL_ATTEMPTS,
            timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}

// Never print the token
impl Debug for ReplicateConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ReplicateConfig")
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "<redacted>"),
            )
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("model_version", &self.model_version)
            .field("gfpgan_version", &self.gfpgan_version)
            .field("scale", &self.scale)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Application configuration
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub replicate: ReplicateConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| SERVER_HOST.to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_upload_size_bytes,
            concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| LOG_FORMAT.to_string()),
        };

        let replicate = ReplicateConfig {
            api_token: lookup("REPLICATE_API_TOKEN")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            api_base: lookup("REPLICATE_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| REPLICATE_API_BASE.to_string()),
            model: lookup("REPLICATE_MODEL").unwrap_or_else(|| GFPGAN_MODEL.to_string()),
            model_version: lookup("REPLICATE_MODEL_VERSION")
                .unwrap_or_else(|| GFPGAN_MODEL_VERSION.to_string()),
            gfpgan_version: GFPGAN_VERSION.to_string(),
            scale: GFPGAN_SCALE,
            poll_interval_ms: lookup("REPLICATE_POLL_INTERVAL_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(POLL_INTERVAL_MS),
            max_poll_attempts: lookup("REPLICATE_MAX_POLL_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_POLL_ATTEMPTS),
            timeout_secs: lookup("REPLICATE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
        };

        Ok(Config { server, replicate })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than zero"));
        }

        if self.server.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        if self.server.concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        if self.replicate.max_poll_attempts == 0 {
            return Err(anyhow::anyhow!(
                "REPLICATE_MAX_POLL_ATTEMPTS must be greater than zero"
            ));
        }

        if !self.replicate.api_base.starts_with("http://")
            && !self.replicate.api_base.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "REPLICATE_API_BASE must be an http(s) URL"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.server.port
    }

    pub fn server_host(&self) -> &str {
        &self.server.host
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.server.environment
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.server.max_upload_size_bytes
    }

    pub fn concurrency_limit(&self) -> usize {
        self.server.concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.server.log_format
    }

    pub fn replicate_api_token(&self) -> Option<&str> {
        self.replicate.api_token.as_deref()
    }

    pub fn has_replicate_token(&self) -> bool {
        self.replicate.api_token.is_some()
    }
}
