//! Image processing module
//!
//! - Decoding and EXIF orientation lookup (processor)
//! - Rotation and mirroring (orientation)
//! - Fixed-ratio center crop (crop)
//! - Pixel-budget downscale (resize)

pub mod crop;
pub mod orientation;
pub mod processor;
pub mod resize;

pub use crop::CenterCrop;
pub use orientation::ImageOrientation;
pub use processor::ImageProcessor;
pub use resize::PixelBudget;
