//! Image processor - decoding and EXIF orientation lookup

use crate::error::NormalizeError;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode raw upload bytes, guessing the format from content
    pub fn decode(data: &[u8]) -> Result<DynamicImage, NormalizeError> {
        if data.is_empty() {
            return Err(NormalizeError::Decode("file is empty".to_string()));
        }

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| NormalizeError::Decode(e.to_string()))?;

        let format = reader.format();
        let img = reader
            .decode()
            .map_err(|e| NormalizeError::Decode(e.to_string()))?;

        let (width, height) = img.dimensions();
        tracing::debug!(
            format = ?format,
            width,
            height,
            color = ?img.color(),
            "Decoded uploaded image"
        );

        Ok(img)
    }

    /// Get dimensions of an encoded image, or `None` if it does not decode
    #[cfg(test)]
    pub(crate) fn get_dimensions(data: &[u8]) -> Option<(u32, u32)> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .ok()?;
        reader.into_dimensions().ok()
    }

    /// Read EXIF orientation tag (0x0112) from image data.
    ///
    /// Returns orientation value (1–8) or 1 (normal) if the container has no EXIF block,
    /// no orientation field, or a value outside the defined range.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let mut cursor = Cursor::new(data);
        let metadata = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(metadata) => metadata,
            Err(_) => return 1,
        };

        metadata
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .and_then(|value| u8::try_from(value).ok())
            .filter(|value| (1..=8).contains(value))
            .unwrap_or(1)
    }

    /// Get rotation and flip operations needed for a given EXIF orientation.
    /// Returns (rotate_angle, flip_horizontal, flip_vertical); rotation is applied first.
    pub fn get_orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
        match orientation {
            1 => (None, false, false),      // Normal
            2 => (None, true, false),       // Mirror horizontal
            3 => (Some(180), false, false), // Rotate 180
            4 => (None, false, true),       // Mirror vertical
            5 => (Some(90), true, false),   // Transpose: rotate 90 CW + mirror horizontal
            6 => (Some(90), false, false),  // Rotate 90 CW
            7 => (Some(270), true, false),  // Transverse: rotate 270 CW + mirror horizontal
            8 => (Some(270), false, false), // Rotate 270 CW
            _ => (None, false, false),      // Invalid, treat as normal
        }
    }
}
