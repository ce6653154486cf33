// camera.rs - Fixed perspective camera on +Z

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_y_deg: config.fov_deg,
            aspect,
            near: config.near,
            far: config.far,
            position: Vec3::new(0.0, 0.0, config.distance),
        }
    }

    /// Aspect from a canvas size. Zero sizes are treated as 1 px.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// WebGL-style clip space (z in [-1, 1]).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
