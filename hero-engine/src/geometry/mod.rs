// geometry/ - Mesh construction
//
// Everything here runs once per session, when the assets arrive.
// The frame loop only touches transforms.

mod model;
mod normals;
mod plane;
mod shapes;

#[cfg(test)]
pub(crate) mod testdata;

pub use model::{Model, ModelPart, import_model, is_accessory_name};
pub use normals::recompute_normals;
pub use plane::{Displacement, bulge, build_displaced_plane, segments_for};
pub use shapes::{wire_cube, wire_sphere};

use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
}

/// Indexed vertex data, one attribute per array.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Axis-aligned bounds, or None for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))))
    }
}
