//! Re:Cap API Library
//!
//! HTTP handlers, error rendering and application setup for the photo rescue service.

mod handlers;
mod middleware;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError, RenderedError};
pub use state::AppState;
