use image::{DynamicImage, GenericImageView};

/// Share of each dimension kept by the center crop
pub const CENTER_CROP_RATIO: f64 = 0.85;

/// Crop rectangle in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Fixed-ratio center crop that keeps the middle 85% of each axis
pub struct CenterCrop;

impl CenterCrop {
    /// Compute the centered crop rectangle for a `width` x `height` source.
    ///
    /// `floor(dim * 0.85)` per axis, never below one pixel; the origin is
    /// `floor((dim - crop) / 2)`.
    pub fn rect(width: u32, height: u32) -> CropRect {
        let crop_width = Self::scaled(width);
        let crop_height = Self::scaled(height);

        CropRect {
            left: (width - crop_width) / 2,
            top: (height - crop_height) / 2,
            width: crop_width,
            height: crop_height,
        }
    }

    fn scaled(dim: u32) -> u32 {
        ((dim as f64 * CENTER_CROP_RATIO).floor() as u32).max(1).min(dim)
    }

    /// Crop the image to its centered 85% region
    pub fn apply(img: &DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();
        let rect = Self::rect(width, height);

        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = rect.width,
            to_height = rect.height,
            left = rect.left,
            top = rect.top,
            "Applying center crop"
        );

        img.crop_imm(rect.left, rect.top, rect.width, rect.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_image;
    use image::GenericImageView;

    #[test]
    fn test_rect_4000x3000() {
        let rect = CenterCrop::rect(4000, 3000);
        assert_eq!(
            rect,
            CropRect {
                left: 300,
                top: 225,
                width: 3400,
                height: 2550,
            }
        );
    }

    #[test]
    fn test_rect_floors_odd_dimensions() {
        // 1001 * 0.85 = 850.85, 333 * 0.85 = 283.05
        let rect = CenterCrop::rect(1001, 333);
        assert_eq!(rect.width, 850);
        assert_eq!(rect.height, 283);
        assert_eq!(rect.left, 75);
        assert_eq!(rect.top, 25);
    }

    #[test]
    fn test_rect_is_centered_within_one_pixel() {
        for (width, height) in [(4000, 3000), (1001, 333), (17, 9), (640, 479), (2, 2)] {
            let rect = CenterCrop::rect(width, height);
            let right_margin = width - rect.width - rect.left;
            let bottom_margin = height - rect.height - rect.top;
            assert!(right_margin.abs_diff(rect.left) <= 1, "{}x{}", width, height);
            assert!(bottom_margin.abs_diff(rect.top) <= 1, "{}x{}", width, height);
        }
    }

    #[test]
    fn test_rect_never_empty() {
        let rect = CenterCrop::rect(1, 1);
        assert_eq!((rect.width, rect.height), (1, 1));
        assert_eq!((rect.left, rect.top), (0, 0));
    }

    #[test]
    fn test_apply_keeps_center_pixels() {
        let img = gradient_image(20, 10);
        let cropped = CenterCrop::apply(&img);

        // 20 -> 17 (left 1), 10 -> 8 (top 1)
        assert_eq!(cropped.dimensions(), (17, 8));
        assert_eq!(cropped.get_pixel(0, 0), img.get_pixel(1, 1));
        assert_eq!(cropped.get_pixel(16, 7), img.get_pixel(17, 8));
    }
}
