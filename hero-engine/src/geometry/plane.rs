// plane.rs - Subdivided photo plane with depth displacement
//
// Layout matches the usual plane primitive: XY plane facing +Z, row 0 at the
// top, UV (0,0) at the bottom-left corner.

use glam::{Vec2, Vec3};

use super::{Mesh, Topology, recompute_normals};
use crate::depth::{DepthBuffer, sample};

/// Per-axis segment cap. Bounds vertex count whatever the image size.
pub const MAX_SEGMENTS: u32 = 128;

/// What pushes the vertices off the plane.
#[derive(Debug, Clone, Copy)]
pub enum Displacement<'a> {
    /// Height map, sampled at each vertex UV.
    Depth(&'a DepthBuffer),
    /// Radial falloff centred on the plane.
    Bulge,
    /// No displacement.
    Flat,
}

/// Segment counts for a source raster, capped per axis.
pub fn segments_for(width_px: u32, height_px: u32) -> (u32, u32) {
    (width_px.clamp(1, MAX_SEGMENTS), height_px.clamp(1, MAX_SEGMENTS))
}

/// `1 - (d / r)^2`, floored at 0.
#[inline]
pub fn bulge(x: f32, y: f32, max_radius: f32) -> f32 {
    if max_radius <= 0.0 { return 0.0; }
    let d = (x * x + y * y).sqrt() / max_radius;
    (1.0 - d * d).max(0.0)
}

/// Build a `width` x `width * aspect` plane and displace it along +Z.
///
/// A depth buffer with no pixels is swapped for the bulge so nothing
/// divides by a zero dimension. Normals always reflect the displaced surface.
pub fn build_displaced_plane(
    width: f32,
    aspect: f32,
    segments_x: u32,
    segments_y: u32,
    displacement: Displacement,
    strength: f32,
) -> Mesh {
    let displacement = match displacement {
        Displacement::Depth(depth) if depth.is_empty() => {
            log::warn!("depth buffer is {}x{}, using bulge", depth.width(), depth.height());
            Displacement::Bulge
        }
        other => other,
    };

    let gx = segments_x.clamp(1, MAX_SEGMENTS);
    let gy = segments_y.clamp(1, MAX_SEGMENTS);
    let height = width * aspect;
    let (half_w, half_h) = (width * 0.5, height * 0.5);
    let max_radius = half_w.max(half_h);

    let count = ((gx + 1) * (gy + 1)) as usize;
    let mut positions = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);

    for iy in 0..=gy {
        let fy = iy as f32 / gy as f32;
        let y = half_h - fy * height;
        for ix in 0..=gx {
            let fx = ix as f32 / gx as f32;
            let x = fx * width - half_w;
            let uv = Vec2::new(fx, 1.0 - fy);

            let z = match displacement {
                Displacement::Depth(depth) => strength * sample(depth, uv.x, uv.y),
                Displacement::Bulge => strength * bulge(x, y, max_radius),
                Displacement::Flat => 0.0,
            };

            positions.push(Vec3::new(x, y, z));
            uvs.push(uv);
        }
    }

    // Two CCW triangles per cell, seen from +Z
    let row = gx + 1;
    let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
    for iy in 0..gy {
        for ix in 0..gx {
            let a = iy * row + ix;
            let b = (iy + 1) * row + ix;
            let c = (iy + 1) * row + ix + 1;
            let d = iy * row + ix + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    let mut mesh = Mesh { positions, normals: Vec::new(), uvs, indices, topology: Topology::Triangles };
    recompute_normals(&mut mesh);
    mesh
}
