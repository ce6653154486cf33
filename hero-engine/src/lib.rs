// lib.rs - Hero engine
//
// Interactive 3D hero for the site header: a glTF model, or a photo pushed
// out of the page by its depth map, lit by the local time of day and
// turned by the cursor.
//
// Everything except `web` is plain Rust with no browser dependency.

pub mod assets;
pub mod config;
pub mod depth;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod lighting;
pub mod pointer;
pub mod scene;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use assets::{AssetFetcher, BuildOutcome, Payload, Role};
pub use config::{HeroConfig, Mode};
pub use error::{HeroError, Result};
pub use frame::{Clock, FrameScheduler, FrameSource, LoopState, Renderer};
pub use lighting::{LightingSample, compute_lighting};
pub use scene::{Camera, Scene, SceneNode};
pub use session::HeroSession;
