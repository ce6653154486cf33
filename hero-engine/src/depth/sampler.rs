// sampler.rs - Depth buffer and nearest-texel sampling
//
// Coordinates are texture-space: u grows right, v grows up.
// Raster rows run top to bottom, so v is flipped before indexing.

use crate::error::{HeroError, Result};

/// Row-major grayscale raster. Channel 0 is the height.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if channels == 0 || data.len() != expected {
            return Err(HeroError::DepthBufferSize { width, height, channels, len: data.len() });
        }
        Ok(Self { width, height, channels, data })
    }

    /// Single-channel buffer.
    pub fn from_luma(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 1, data)
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn channels(&self) -> u8 { self.channels }

    /// Zero width or height. Nothing can be sampled.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Height over width, the aspect the photo plane is built with.
    pub fn aspect(&self) -> Option<f32> {
        if self.is_empty() { return None; }
        Some(self.height as f32 / self.width as f32)
    }

    /// Raw channel-0 value at a clamped texel.
    #[inline]
    pub fn texel(&self, col: u32, row: u32) -> u8 {
        let col = col.min(self.width.saturating_sub(1)) as usize;
        let row = row.min(self.height.saturating_sub(1)) as usize;
        self.data[(row * self.width as usize + col) * self.channels as usize]
    }
}

/// Height at (u, v) in [0, 1].
///
/// Out-of-range and NaN coordinates clamp to the nearest edge texel.
/// An empty buffer reads as 0.
#[inline]
pub fn sample(depth: &DepthBuffer, u: f32, v: f32) -> f32 {
    if depth.is_empty() { return 0.0; }

    let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };

    let col = (u * depth.width as f32).floor() as u32;
    let row = ((1.0 - v) * depth.height as f32).floor() as u32;
    depth.texel(col, row) as f32 / 255.0
}
