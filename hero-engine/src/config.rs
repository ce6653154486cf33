// config.rs - Session configuration
//
// Parsed from a JSON blob handed over by the host page. Every field has a
// default, so `{}` is a valid config that reproduces the stock hero.

use serde::Deserialize;

use crate::error::Result;

/// Lowest accepted `lighting.intensity_min`. The scene never goes black.
pub const INTENSITY_FLOOR: f32 = 0.05;

/// Which asset set the hero is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// A single glTF/GLB model.
    #[default]
    Model,
    /// A color photo displaced by a grayscale depth map.
    PhotoDepth,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub mode: Mode,
    pub canvas_id: String,
    pub toggle_id: String,
    pub model_uri: Option<String>,
    pub color_uri: Option<String>,
    pub depth_uri: Option<String>,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub plane: PlaneConfig,
    pub motion: MotionConfig,
    /// Fraction of the remaining pointer distance covered per frame.
    pub pointer_rate: f32,
    /// Intersection ratio above which the canvas counts as visible.
    pub visibility_threshold: f64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Model,
            canvas_id: "hero-canvas".into(),
            toggle_id: "glasses-toggle".into(),
            model_uri: Some("assets/me-cellshaded.glb".into()),
            color_uri: None,
            depth_uri: None,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            plane: PlaneConfig::default(),
            motion: MotionConfig::default(),
            pointer_rate: 0.08,
            visibility_threshold: 0.1,
        }
    }
}

impl HeroConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.pointer_rate = config.pointer_rate.clamp(f32::EPSILON, 1.0);
        // NaN also lands on the floor
        config.lighting.intensity_min = INTENSITY_FLOOR.max(config.lighting.intensity_min);
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Camera sits on +Z looking at the origin.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { fov_deg: 35.0, near: 0.1, far: 100.0, distance: 3.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Intensity at midnight. Keeps the scene from going fully dark.
    pub intensity_min: f32,
    /// Intensity at noon.
    pub intensity_max: f32,
    /// Seconds of animation time between sun recomputations.
    pub refresh_interval_s: f64,
    /// Accessory is shown while intensity is at or above this value.
    pub accessory_threshold: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            intensity_min: 2.5,
            intensity_max: 5.0,
            refresh_interval_s: 1.0,
            accessory_threshold: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    /// World-space width of the photo plane.
    pub width: f32,
    /// Displacement along +Z for a depth sample of 1.0.
    pub depth_strength: f32,
    /// Use the procedural bulge instead of a flat plane when depth fails.
    pub bulge_on_missing_depth: bool,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            width: 2.0,
            depth_strength: 0.3,
            bulge_on_missing_depth: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Radians per second of continuous spin (~60s per turn).
    pub spin_rate: f32,
    pub wobble_amp: f32,
    pub wobble_rate: f32,
    pub nod_amp: f32,
    pub nod_rate: f32,
    /// Extra rotation (radians) at full pointer deflection.
    pub pointer_tilt: f32,
    /// Placeholder spin rates around x and y.
    pub placeholder_spin: [f32; 2],
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            spin_rate: 0.1,
            wobble_amp: 0.05,
            wobble_rate: 0.15,
            nod_amp: 0.03,
            nod_rate: 0.1,
            pointer_tilt: 0.15,
            placeholder_spin: [0.5, 0.7],
        }
    }
}
