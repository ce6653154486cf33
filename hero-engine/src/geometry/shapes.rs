// shapes.rs - Wireframe fallback shapes
//
// Shown while assets load and kept when they fail.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::{Mesh, Topology};

/// Axis-aligned cube edges, `size` per side, centred on the origin.
pub fn wire_cube(size: f32) -> Mesh {
    let h = size * 0.5;
    let positions: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h } else { h },
                if i & 2 == 0 { -h } else { h },
                if i & 4 == 0 { -h } else { h },
            )
        })
        .collect();

    // Corners differing in exactly one bit share an edge
    let mut indices = Vec::with_capacity(24);
    for a in 0..8u32 {
        for bit in [1u32, 2, 4] {
            let b = a | bit;
            if b != a {
                indices.extend_from_slice(&[a, b]);
            }
        }
    }

    Mesh {
        normals: positions.iter().map(|p| p.normalize()).collect(),
        uvs: vec![Vec2::ZERO; positions.len()],
        positions,
        indices,
        topology: Topology::Lines,
    }
}

/// UV sphere edges: latitude rings plus meridians.
pub fn wire_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut positions = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    let mut uvs = Vec::with_capacity(positions.capacity());
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * TAU;
            positions.push(Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
            uvs.push(Vec2::new(u, 1.0 - v));
        }
    }

    let row = ws + 1;
    let mut indices = Vec::new();
    for iy in 0..=hs {
        for ix in 0..ws {
            let a = iy * row + ix;
            // Rings collapse to a point at the poles
            if iy != 0 && iy != hs {
                indices.extend_from_slice(&[a, a + 1]);
            }
            if iy < hs {
                indices.extend_from_slice(&[a, a + row]);
            }
        }
    }

    Mesh {
        normals: positions.iter().map(|p| p.try_normalize().unwrap_or(Vec3::Y)).collect(),
        positions,
        uvs,
        indices,
        topology: Topology::Lines,
    }
}
