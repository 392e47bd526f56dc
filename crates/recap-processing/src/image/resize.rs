use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Largest input the hosted GPU accepts, in pixels
pub const UPSTREAM_PIXEL_LIMIT: u64 = 2_096_704;

/// Local ceiling, kept below `UPSTREAM_PIXEL_LIMIT`
pub const MAX_PIXELS: u64 = 2_000_000;

/// Downscale that keeps the total pixel count under a fixed ceiling
pub struct PixelBudget;

impl PixelBudget {
    /// Target dimensions for a `width` x `height` image, or `None` when it already fits.
    ///
    /// Both axes are scaled by `sqrt(max_pixels / (width * height))` and floored, so the
    /// aspect ratio is preserved up to rounding.
    pub fn target_dimensions(width: u32, height: u32, max_pixels: u64) -> Option<(u32, u32)> {
        let pixels = width as u64 * height as u64;
        if pixels <= max_pixels {
            return None;
        }

        let ratio = (max_pixels as f64 / pixels as f64).sqrt();
        let new_width = ((width as f64 * ratio).floor() as u32).max(1);
        let new_height = ((height as f64 * ratio).floor() as u32).max(1);

        Some((new_width, new_height))
    }

    /// Resize with Lanczos3 when the image exceeds `MAX_PIXELS`, otherwise return it unchanged
    pub fn apply(img: DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();

        match Self::target_dimensions(width, height, MAX_PIXELS) {
            Some((new_width, new_height)) => {
                tracing::info!(
                    from_width = width,
                    from_height = height,
                    to_width = new_width,
                    to_height = new_height,
                    max_pixels = MAX_PIXELS,
                    "Resizing image to pixel budget"
                );
                img.resize_exact(new_width, new_height, FilterType::Lanczos3)
            }
            None => {
                tracing::info!(width, height, "Image within pixel budget");
                img
            }
        }
    }
}
