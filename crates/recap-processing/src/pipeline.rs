//! Image normalization pipeline
//!
//! Runs, in order:
//! 1. Decode
//! 2. EXIF orientation correction
//! 3. RGB conversion
//! 4. 85% center crop
//! 5. Pixel-budget downscale
//! 6. JPEG encode
//!
//! Each step either succeeds or aborts the run; there is no partial output.

use crate::compression::{ImageCompressor, JPEG_QUALITY};
use crate::error::NormalizeError;
use crate::image::{CenterCrop, ImageOrientation, ImageProcessor, PixelBudget};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, RgbImage};
use serde::Serialize;

/// Dimensions observed after each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub original_width: u32,
    pub original_height: u32,
    pub orientation: u8,
    pub oriented_width: u32,
    pub oriented_height: u32,
    pub cropped_width: u32,
    pub cropped_height: u32,
    pub output_width: u32,
    pub output_height: u32,
    pub resized: bool,
}

/// Encoded JPEG ready to send upstream, plus how it was produced
#[derive(Debug, Clone)]
pub struct NormalizedOutput {
    pub data: Bytes,
    pub report: NormalizationReport,
}

/// Deterministic decode → orient → crop → budget → encode pipeline
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    quality: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl ImageNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full pipeline on raw upload bytes
    pub fn normalize(&self, data: &[u8]) -> Result<NormalizedOutput, NormalizeError> {
        let img = ImageProcessor::decode(data)?;
        let original = img.dimensions();
        let (img, orientation) = ImageOrientation::apply_exif_orientation(img, data);

        let (rgb, report) = self.normalize_oriented(img, original, orientation);
        let encoded = ImageCompressor::compress_jpeg(&rgb, self.quality)?;

        tracing::info!(
            original_width = report.original_width,
            original_height = report.original_height,
            orientation = report.orientation,
            output_width = report.output_width,
            output_height = report.output_height,
            resized = report.resized,
            size_bytes = encoded.len(),
            "Image normalized"
        );

        Ok(NormalizedOutput {
            data: encoded,
            report,
        })
    }

    /// Steps 2–5 on an already decoded raster with a known EXIF orientation
    pub fn normalize_decoded(
        &self,
        img: DynamicImage,
        orientation: u8,
    ) -> (RgbImage, NormalizationReport) {
        let original = img.dimensions();
        let img = ImageOrientation::apply_orientation(img, orientation);
        self.normalize_oriented(img, original, orientation)
    }

    /// Steps 3–5, given the raster after orientation correction
    fn normalize_oriented(
        &self,
        img: DynamicImage,
        (original_width, original_height): (u32, u32),
        orientation: u8,
    ) -> (RgbImage, NormalizationReport) {
        let (oriented_width, oriented_height) = img.dimensions();
        if (oriented_width, oriented_height) != (original_width, original_height) {
            tracing::info!(
                from_width = original_width,
                from_height = original_height,
                to_width = oriented_width,
                to_height = oriented_height,
                "EXIF orientation swapped dimensions"
            );
        }

        let img = match img {
            DynamicImage::ImageRgb8(_) => img,
            other => {
                tracing::debug!(color = ?other.color(), "Converting to RGB");
                DynamicImage::ImageRgb8(other.to_rgb8())
            }
        };

        let img = CenterCrop::apply(&img);
        let (cropped_width, cropped_height) = img.dimensions();
        tracing::info!(
            from_width = oriented_width,
            from_height = oriented_height,
            to_width = cropped_width,
            to_height = cropped_height,
            "Center crop (85%)"
        );

        let img = PixelBudget::apply(img);
        let (output_width, output_height) = img.dimensions();

        let report = NormalizationReport {
            original_width,
            original_height,
            orientation,
            oriented_width,
            oriented_height,
            cropped_width,
            cropped_height,
            output_width,
            output_height,
            resized: (output_width, output_height) != (cropped_width, cropped_height),
        };

        (img.into_rgb8(), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::crop::CenterCrop;
    use crate::image::resize::{PixelBudget, MAX_PIXELS};
    use crate::test_helpers::{
        encode_png, gradient_image, jpeg_with_orientation, stored_for_orientation,
    };
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn test_normalize_png_end_to_end() {
        let data = encode_png(&gradient_image(200, 100));
        let output = ImageNormalizer::new().normalize(&data).unwrap();

        assert_eq!(output.report.cropped_width, 170);
        assert_eq!(output.report.cropped_height, 85);
        assert_eq!(output.report.output_width, 170);
        assert_eq!(output.report.output_height, 85);
        assert!(!output.report.resized);
        assert_eq!(ImageProcessor::get_dimensions(&output.data), Some((170, 85)));
    }

    #[test]
    fn test_malformed_input_is_decode_error() {
        let result = ImageNormalizer::new().normalize(b"\x00\x01definitely not a photo");
        assert!(matches!(result, Err(NormalizeError::Decode(_))));
    }

    #[test]
    fn test_panorama_wider_than_jpeg_limit_is_encode_error() {
        // 80000x2 crops to 68000x1: under the pixel budget, over libjpeg's 65500 px side
        let img = DynamicImage::ImageRgb8(RgbImage::new(80_000, 2));
        let result = ImageNormalizer::new().normalize(&encode_png(&img));
        assert!(matches!(result, Err(NormalizeError::Encode(_))));
    }

    #[test]
    fn test_output_is_rgb_for_rgba_input() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([10, 20, 30, 128])));
        let (rgb, report) = ImageNormalizer::new().normalize_decoded(img, 1);
        assert_eq!(rgb.dimensions(), (34, 17));
        assert_eq!(report.output_width, 34);
    }

    #[test]
    fn test_output_is_rgb_for_grayscale_input() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(20, 20, Luma([77])));
        let data = encode_png(&img);
        let output = ImageNormalizer::new().normalize(&data).unwrap();

        let decoded = ImageProcessor::decode(&output.data).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!(decoded.dimensions(), (17, 17));
    }

    #[test]
    fn test_rotated_jpeg_is_cropped_after_orientation() {
        // Stored 30x40 with "rotate 90" tag: intended display is 40x30
        let data = jpeg_with_orientation(&gradient_image(30, 40), 6);
        let output = ImageNormalizer::new().normalize(&data).unwrap();

        assert_eq!(output.report.orientation, 6);
        assert_eq!((output.report.original_width, output.report.original_height), (30, 40));
        assert_eq!((output.report.oriented_width, output.report.oriented_height), (40, 30));
        // floor(40 * 0.85) x floor(30 * 0.85)
        assert_eq!((output.report.output_width, output.report.output_height), (34, 25));
    }

    #[test]
    fn test_orientation_tags_yield_identical_output() {
        let visual = gradient_image(41, 23);
        let normalizer = ImageNormalizer::new();
        let (expected, expected_report) = normalizer.normalize_decoded(visual.clone(), 1);
        let expected_jpeg = ImageCompressor::compress_jpeg(&expected, JPEG_QUALITY).unwrap();

        for orientation in 2..=8u8 {
            let stored = stored_for_orientation(&visual, orientation);
            let (rgb, report) = normalizer.normalize_decoded(stored, orientation);

            assert_eq!(rgb.as_raw(), expected.as_raw(), "orientation {}", orientation);
            assert_eq!(report.output_width, expected_report.output_width);
            assert_eq!(report.output_height, expected_report.output_height);

            let jpeg = ImageCompressor::compress_jpeg(&rgb, JPEG_QUALITY).unwrap();
            assert_eq!(jpeg, expected_jpeg, "orientation {}", orientation);
        }
    }

    #[test]
    fn test_aspect_ratio_matches_cropped_oriented_input() {
        for (width, height, orientation) in [(90, 60, 1u8), (90, 60, 6), (61, 97, 8), (50, 50, 3)] {
            let stored = gradient_image(width, height);
            let (rgb, report) = ImageNormalizer::new().normalize_decoded(stored, orientation);

            let (oriented_w, oriented_h) = if matches!(orientation, 5..=8) {
                (height, width)
            } else {
                (width, height)
            };
            let rect = CenterCrop::rect(oriented_w, oriented_h);
            assert_eq!(rgb.dimensions(), (rect.width, rect.height));
            assert_eq!((report.cropped_width, report.cropped_height), (rect.width, rect.height));
        }
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let data = encode_png(&gradient_image(120, 80));
        let normalizer = ImageNormalizer::new();
        let first = normalizer.normalize(&data).unwrap();
        let second = normalizer.normalize(&data).unwrap();
        assert_eq!(first.data, second.data);
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn test_large_photo_scenario_dimensions() {
        // 4000x3000, no orientation tag
        let rect = CenterCrop::rect(4000, 3000);
        assert_eq!((rect.width, rect.height), (3400, 2550));
        assert_eq!(rect.width as u64 * rect.height as u64, 8_670_000);

        let (width, height) = PixelBudget::target_dimensions(rect.width, rect.height, MAX_PIXELS)
            .expect("8.67 MP exceeds the budget");
        assert_eq!((width, height), (1632, 1224));
        assert!(width as u64 * height as u64 <= MAX_PIXELS);
    }

    #[test]
    fn test_over_budget_image_is_resized() {
        // 1800x1400 -> crop 1530x1190 = 1,820,700 px: under budget
        // 1900x1500 -> crop 1615x1275 = 2,059,125 px: over budget
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1900, 1500, image::Rgb([90, 120, 150])));
        let (rgb, report) = ImageNormalizer::new().normalize_decoded(img, 1);

        assert_eq!((report.cropped_width, report.cropped_height), (1615, 1275));
        assert!(report.resized);
        assert!(rgb.width() as u64 * rgb.height() as u64 <= MAX_PIXELS);
        assert_eq!(
            Some(rgb.dimensions()),
            PixelBudget::target_dimensions(1615, 1275, MAX_PIXELS)
        );
    }
}
