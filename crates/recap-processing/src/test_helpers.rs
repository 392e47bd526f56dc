//! Fixtures shared by unit tests

use crate::compression::ImageCompressor;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::ImageEXIF;
use std::io::Cursor;

/// Non-symmetric RGB test pattern, so any rotation or mirror changes the pixels
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 7 % 256) as u8,
            (y * 11 % 256) as u8,
            ((x * 3 + y * 5) % 256) as u8,
        ])
    }))
}

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Big-endian TIFF block holding a single IFD0 entry: Orientation (SHORT)
fn orientation_tiff(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes()); // count
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD
    tiff
}

/// Encode `img` as JPEG and attach an EXIF orientation tag
pub fn jpeg_with_orientation(img: &DynamicImage, orientation: u16) -> Vec<u8> {
    let data = ImageCompressor::compress_jpeg(&img.to_rgb8(), 95).unwrap();
    let mut jpeg = Jpeg::from_bytes(data.to_vec().into()).unwrap();
    jpeg.set_exif(Some(orientation_tiff(orientation).into()));
    jpeg.encoder().bytes().to_vec()
}

/// The raster a camera would store for `visual` when writing `orientation`
pub fn stored_for_orientation(visual: &DynamicImage, orientation: u8) -> DynamicImage {
    match orientation {
        2 => visual.fliph(),
        3 => visual.rotate180(),
        4 => visual.flipv(),
        5 => visual.rotate90().fliph(),
        6 => visual.rotate270(),
        7 => visual.rotate270().fliph(),
        8 => visual.rotate90(),
        _ => visual.clone(),
    }
}
