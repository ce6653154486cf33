// scene/ - What the renderer draws
//
// A flat list of tagged nodes. Exactly one of Placeholder / Final is
// present at any time; the swap between them is a single call.
// `generation` bumps on every membership change so the renderer knows
// when to re-upload geometry.

mod camera;

pub use camera::Camera;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::{Mesh, Model};

/// Loading indicator tint (#58a6ff).
pub const PLACEHOLDER_COLOR: Vec3 = Vec3::new(0x58 as f32 / 255.0, 0xa6 as f32 / 255.0, 1.0);
/// Tint once every asset failed (#ff6666).
pub const ERROR_COLOR: Vec3 = Vec3::new(1.0, 0x66 as f32 / 255.0, 0x66 as f32 / 255.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: 1.0 }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
            self.position,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Placeholder {
    pub mesh: Mesh,
    pub color: Vec3,
    pub transform: Transform,
    /// Every asset failed; this is now the permanent visual.
    pub failed: bool,
}

impl Placeholder {
    pub fn new(mesh: Mesh) -> Self {
        Self { mesh, color: PLACEHOLDER_COLOR, transform: Transform::default(), failed: false }
    }

    pub fn mark_failed(&mut self) {
        self.failed = true;
        self.color = ERROR_COLOR;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalKind {
    Model,
    /// Photo plane displaced by its depth map.
    Displaced,
    /// Photo plane, no depth.
    Flat,
    /// Photo plane with the procedural bulge.
    Bulge,
}

#[derive(Debug, Clone)]
pub struct FinalObject {
    pub kind: FinalKind,
    /// Photo planes are a single textured part.
    pub model: Model,
    pub transform: Transform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point { range: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub enum SceneNode {
    Placeholder(Placeholder),
    Final(FinalObject),
    Light(Light),
}

#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    generation: u64,
}

impl Scene {
    /// Placeholder plus the fixed rig: white ambient, cool fill from
    /// below-behind, and the pointer-following sun.
    pub fn new(placeholder: Placeholder) -> Self {
        let nodes = vec![
            SceneNode::Light(Light {
                kind: LightKind::Ambient,
                color: Vec3::ONE,
                intensity: 0.6,
                position: Vec3::ZERO,
            }),
            SceneNode::Light(Light {
                kind: LightKind::Directional,
                color: Vec3::new(0x44 as f32 / 255.0, 0x88 as f32 / 255.0, 0xcc as f32 / 255.0),
                intensity: 0.4,
                position: Vec3::new(-1.0, -1.0, -1.0),
            }),
            SceneNode::Light(Light {
                kind: LightKind::Point { range: 10.0 },
                color: Vec3::ONE,
                intensity: 1.0,
                position: Vec3::new(0.0, 0.0, 3.0),
            }),
            SceneNode::Placeholder(placeholder),
        ];
        Self { nodes, generation: 0 }
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.nodes.iter().find_map(|n| match n {
            SceneNode::Placeholder(p) => Some(p),
            _ => None,
        })
    }

    pub fn placeholder_mut(&mut self) -> Option<&mut Placeholder> {
        self.nodes.iter_mut().find_map(|n| match n {
            SceneNode::Placeholder(p) => Some(p),
            _ => None,
        })
    }

    pub fn final_object(&self) -> Option<&FinalObject> {
        self.nodes.iter().find_map(|n| match n {
            SceneNode::Final(f) => Some(f),
            _ => None,
        })
    }

    pub fn final_object_mut(&mut self) -> Option<&mut FinalObject> {
        self.nodes.iter_mut().find_map(|n| match n {
            SceneNode::Final(f) => Some(f),
            _ => None,
        })
    }

    /// The point light that tracks the pointer and carries the time of day.
    pub fn sun_mut(&mut self) -> Option<&mut Light> {
        self.nodes.iter_mut().find_map(|n| match n {
            SceneNode::Light(l @ Light { kind: LightKind::Point { .. }, .. }) => Some(l),
            _ => None,
        })
    }

    pub fn sun(&self) -> Option<&Light> {
        self.nodes.iter().find_map(|n| match n {
            SceneNode::Light(l @ Light { kind: LightKind::Point { .. }, .. }) => Some(l),
            _ => None,
        })
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Light(l) => Some(l),
            _ => None,
        })
    }

    /// Swap the placeholder for the final object in one step.
    /// Returns false (and changes nothing) if a final object already exists.
    pub fn install_final(&mut self, object: FinalObject) -> bool {
        if self.final_object().is_some() {
            return false;
        }
        self.nodes.retain(|n| !matches!(n, SceneNode::Placeholder(_)));
        self.nodes.push(SceneNode::Final(object));
        self.generation += 1;
        true
    }

    /// Keep the placeholder as the permanent visual, tinted as an error.
    pub fn fail_placeholder(&mut self) {
        if let Some(p) = self.placeholder_mut() {
            if !p.failed {
                p.mark_failed();
                self.generation += 1;
            }
        }
    }
}
