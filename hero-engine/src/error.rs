// error.rs - Engine error type
//
// Every variant is recoverable from the frame loop's point of view:
// callers log it and fall back to a simpler visual.

use crate::assets::Role;

#[derive(Debug, thiserror::Error)]
pub enum HeroError {
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{0:?} asset was already requested")]
    AssetAlreadyRequested(Role),

    #[error("{0:?} asset already settled")]
    AssetAlreadySettled(Role),

    #[error("{0:?} asset was never requested")]
    AssetNotRequested(Role),

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("depth buffer is {len} bytes, expected {width}x{height}x{channels}")]
    DepthBufferSize {
        width: u32,
        height: u32,
        channels: u8,
        len: usize,
    },

    #[error("model import failed: {0}")]
    Model(#[from] gltf::Error),

    #[error("model has no triangle geometry")]
    ModelEmpty,
}

pub type Result<T> = std::result::Result<T, HeroError>;
