// decode.rs - Image bytes to pixel buffers
//
// A decode failure here plays the role of a blocked pixel readback:
// the color image may still be usable even when depth is not.

use image::GenericImageView;

use super::DepthBuffer;
use crate::error::Result;

/// RGBA8 texture for the photo plane.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ColorImage {
    /// Height over width.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 { return 1.0; }
        self.height as f32 / self.width as f32
    }
}

pub fn decode_color(bytes: &[u8]) -> Result<ColorImage> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    Ok(ColorImage { width, height, rgba: img.to_rgba8().into_raw() })
}

/// Decode any supported image into a single-channel height map.
/// Color inputs are reduced to luminance.
pub fn decode_depth(bytes: &[u8]) -> Result<DepthBuffer> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    DepthBuffer::from_luma(width, height, img.to_luma8().into_raw())
}
