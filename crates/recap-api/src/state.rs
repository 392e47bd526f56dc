//! Application state shared by all handlers

use recap_core::Config;
use recap_plugins::{RestorationClient, RestorationParams};
use recap_processing::ImageNormalizer;
use std::sync::Arc;

/// Immutable per-process state, shared behind an `Arc`
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub normalizer: ImageNormalizer,
    /// `None` when no API token is configured
    pub restoration: Option<Arc<dyn RestorationClient>>,
    pub restoration_params: RestorationParams,
}

impl AppState {
    pub fn new(config: Config, restoration: Option<Arc<dyn RestorationClient>>) -> Self {
        let restoration_params = RestorationParams::from_config(&config.replicate);
        Self {
            config,
            normalizer: ImageNormalizer::new(),
            restoration,
            restoration_params,
        }
    }
}
