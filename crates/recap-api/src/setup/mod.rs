//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use recap_core::Config;
use recap_plugins::{ReplicateGfpganClient, RestorationClient};
use std::sync::Arc;

pub const SERVICE_NAME: &str = "Re:Cap - Invisible Photo Rescue";

/// Build state and router from configuration
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    let restoration: Option<Arc<dyn RestorationClient>> =
        match ReplicateGfpganClient::from_config(&config.replicate)
            .context("Failed to create Replicate client")?
        {
            Some(client) => {
                tracing::info!(
                    model = %config.replicate.model,
                    api_base = %config.replicate.api_base,
                    "Replicate client configured"
                );
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!(
                    "REPLICATE_API_TOKEN is not set; /rescue will fail until it is configured"
                );
                None
            }
        };

    let state = Arc::new(AppState::new(config.clone(), restoration));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
