//! Re:Cap restoration clients
//!
//! The API layer depends only on the `RestorationClient` trait; concrete hosted
//! models live behind feature flags.

pub mod restoration;

#[cfg(feature = "plugin-replicate-gfpgan")]
pub mod replicate_gfpgan;

pub use restoration::{
    extract_result_url, RestorationClient, RestorationError, RestorationOutput, RestorationParams,
};

#[cfg(feature = "plugin-replicate-gfpgan")]
pub use replicate_gfpgan::ReplicateGfpganClient;
