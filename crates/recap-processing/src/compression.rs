use crate::error::NormalizeError;
use bytes::Bytes;
use image::RgbImage;

/// JPEG quality used for everything sent upstream
pub const JPEG_QUALITY: u8 = 95;

/// JPEG compression service
pub struct ImageCompressor;

impl ImageCompressor {
    /// Compress an RGB image to baseline JPEG using mozjpeg.
    ///
    /// Output carries no EXIF block, so orientation is whatever the pixels say.
    /// libjpeg fatal errors (e.g. a side over 65500 px) unwind out of mozjpeg and
    /// are returned as `NormalizeError::Encode`.
    pub fn compress_jpeg(img: &RgbImage, quality: u8) -> Result<Bytes, NormalizeError> {
        let (width, height) = img.dimensions();

        let jpeg_data = std::panic::catch_unwind(|| -> Result<Vec<u8>, NormalizeError> {
            let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
            comp.set_size(width as usize, height as usize);
            comp.set_quality(quality as f32);
            comp.set_optimize_coding(true);

            let estimated_size = (width as usize * height as usize) / 2;
            let mut comp = comp
                .start_compress(Vec::with_capacity(estimated_size))
                .map_err(|e| NormalizeError::Encode(e.to_string()))?;
            comp.write_scanlines(img.as_raw())
                .map_err(|e| NormalizeError::Encode(e.to_string()))?;
            comp.finish()
                .map_err(|e| NormalizeError::Encode(e.to_string()))
        })
        .map_err(|payload| NormalizeError::Encode(panic_message(payload.as_ref())))??;

        tracing::debug!(
            width,
            height,
            quality,
            size_bytes = jpeg_data.len(),
            "Encoded JPEG"
        );

        Ok(Bytes::from(jpeg_data))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "JPEG encoder aborted".to_string()
    }
}
