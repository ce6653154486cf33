// normals.rs - Vertex normals from faces
//
// Area-weighted: each triangle adds its unnormalized cross product to its
// three corners, so large faces dominate.

use glam::Vec3;

use super::{Mesh, Topology};

/// Rebuild `mesh.normals` from its current positions.
/// Line meshes and isolated vertices get +Z.
pub fn recompute_normals(mesh: &mut Mesh) {
    let mut acc = vec![Vec3::ZERO; mesh.positions.len()];

    if mesh.topology == Topology::Triangles {
        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(&pa), Some(&pb), Some(&pc)) =
                (mesh.positions.get(a), mesh.positions.get(b), mesh.positions.get(c))
            else {
                continue;
            };

            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
    }

    mesh.normals = acc.into_iter().map(|n| n.try_normalize().unwrap_or(Vec3::Z)).collect();
}
