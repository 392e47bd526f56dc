//! Re:Cap Image Processing Library
//!
//! This crate turns an uploaded photo into the image sent to the restoration model:
//! decode, EXIF orientation fix, RGB conversion, 85% center crop, pixel-budget
//! downscale and JPEG re-encode.

pub mod compression;
pub mod error;
pub mod image;
pub mod pipeline;

// Re-export commonly used types
pub use compression::ImageCompressor;
pub use error::NormalizeError;
pub use crate::image::{CenterCrop, ImageOrientation, ImageProcessor, PixelBudget};
pub use pipeline::{ImageNormalizer, NormalizationReport, NormalizedOutput};

#[cfg(test)]
mod test_helpers;
