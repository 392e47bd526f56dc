//! Re:Cap Core Library
//!
//! This crate provides the configuration and error types shared across all Re:Cap
//! components.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Config, ReplicateConfig, ServerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
