// model.rs - glTF/GLB import
//
// Flattens the default scene into world-space parts, then centres and
// scales the whole model so its largest side is FIT_SIZE units.
// Parts whose node (or any ancestor) looks like eyewear are tagged as
// accessories so lighting and the toggle button can hide them.
// Materials keep their base color factor and base color texture; other
// PBR channels are dropped.

use glam::{Mat3, Mat4, Vec2, Vec3};

use super::{Mesh, Topology, recompute_normals};
use crate::depth::ColorImage;
use crate::error::{HeroError, Result};

/// Largest model dimension after fitting.
const FIT_SIZE: f32 = 1.5;
/// Shift down so the head and face sit in frame.
const FIT_DROP: f32 = 0.1;

const ACCESSORY_WORDS: &[&str] = &["glass", "lens", "spectacle", "eyewear"];
// Only consulted when nothing matched above
const ACCESSORY_WORDS_DEEP: &[&str] = &["glass", "lens", "spectacle", "eyewear", "frame"];

#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub mesh: Mesh,
    /// Multiplied into the texture (or used alone without one).
    pub base_color: [f32; 4],
    /// Index into `Model::textures`.
    pub texture: Option<usize>,
    pub accessory: bool,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub parts: Vec<ModelPart>,
    pub textures: Vec<ColorImage>,
}

impl Model {
    pub fn accessory_count(&self) -> usize {
        self.parts.iter().filter(|p| p.accessory).count()
    }

    pub fn set_accessory_visible(&mut self, visible: bool) {
        for part in self.parts.iter_mut().filter(|p| p.accessory) {
            part.visible = visible;
        }
    }
}

/// Case-insensitive keyword match on a node or mesh name.
pub fn is_accessory_name(name: &str, deep: bool) -> bool {
    let name = name.to_lowercase();
    let words = if deep { ACCESSORY_WORDS_DEEP } else { ACCESSORY_WORDS };
    words.iter().any(|w| name.contains(w))
}

/// Import a `.glb` or `.gltf` (with embedded buffers) payload.
pub fn import_model(bytes: &[u8]) -> Result<Model> {
    let (document, buffers, images) = gltf::import_slice(bytes)?;

    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        return Err(HeroError::ModelEmpty);
    };

    let mut raw = Vec::new();
    for node in scene.nodes() {
        visit(&node, Mat4::IDENTITY, &mut Vec::new(), &buffers, &mut raw);
    }
    if raw.is_empty() {
        return Err(HeroError::ModelEmpty);
    }

    // Image index -> texture index, skipping formats we cannot upload
    let mut textures = Vec::new();
    let mut texture_of = vec![None; images.len()];
    for (i, data) in images.iter().enumerate() {
        match to_color_image(data) {
            Some(image) => {
                texture_of[i] = Some(textures.len());
                textures.push(image);
            }
            None => log::warn!("skipping model image {} ({:?})", i, data.format),
        }
    }

    let tag = |deep: bool, names: &[String]| names.iter().any(|n| is_accessory_name(n, deep));
    let deep = !raw.iter().any(|r| tag(false, &r.names));

    let mut parts: Vec<ModelPart> = raw
        .into_iter()
        .map(|r| ModelPart {
            accessory: tag(deep, &r.names),
            name: r.names.last().cloned().unwrap_or_default(),
            mesh: r.mesh,
            base_color: r.base_color,
            texture: r.image.and_then(|i| texture_of.get(i).copied().flatten()),
            visible: true,
        })
        .collect();

    fit_to_view(&mut parts);

    let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
    log::info!("model parts: {:?}", names);
    let accessories = parts.iter().filter(|p| p.accessory).count();
    if accessories > 0 {
        log::debug!("{} accessory parts (deep search: {})", accessories, deep);
    }

    Ok(Model { parts, textures })
}

struct RawPart {
    // Ancestor names first, own node and mesh names last
    names: Vec<String>,
    mesh: Mesh,
    base_color: [f32; 4],
    image: Option<usize>,
}

fn visit(
    node: &gltf::Node,
    parent: Mat4,
    names: &mut Vec<String>,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<RawPart>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    let pushed = match node.name() {
        Some(name) => {
            names.push(name.to_string());
            true
        }
        None => false,
    };

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles { continue; }
            let Some(m) = read_primitive(&primitive, buffers, world) else { continue };

            let mut part_names = names.clone();
            if let Some(mesh_name) = mesh.name() {
                part_names.push(mesh_name.to_string());
            }
            let pbr = primitive.material().pbr_metallic_roughness();
            out.push(RawPart {
                names: part_names,
                mesh: m,
                base_color: pbr.base_color_factor(),
                image: pbr.base_color_texture().map(|info| info.texture().source().index()),
            });
        }
    }

    for child in node.children() {
        visit(&child, world, names, buffers, out);
    }

    if pushed {
        names.pop();
    }
}

fn read_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data], world: Mat4) -> Option<Mesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

    let positions: Vec<Vec3> = reader
        .read_positions()?
        .map(|p| world.transform_point3(Vec3::from(p)))
        .collect();
    if positions.is_empty() { return None; }

    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    let normals: Option<Vec<Vec3>> = reader.read_normals().map(|iter| {
        iter.map(|n| (normal_matrix * Vec3::from(n)).try_normalize().unwrap_or(Vec3::Z)).collect()
    });

    let uvs: Vec<Vec2> = reader
        .read_tex_coords(0)
        .map(|t| t.into_f32().map(Vec2::from).collect())
        .unwrap_or_else(|| vec![Vec2::ZERO; positions.len()]);

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|i| i.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let mut mesh = Mesh { positions, normals: Vec::new(), uvs, indices, topology: Topology::Triangles };
    match normals {
        Some(n) if n.len() == mesh.positions.len() => mesh.normals = n,
        _ => recompute_normals(&mut mesh),
    }
    Some(mesh)
}

/// Expand 8-bit glTF image data to RGBA8. Wider formats are not supported.
fn to_color_image(data: &gltf::image::Data) -> Option<ColorImage> {
    use gltf::image::Format;

    let rgba = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data.pixels.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
        Format::R8G8 => data.pixels.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect(),
        Format::R8 => data.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        _ => return None,
    };
    if rgba.len() != data.width as usize * data.height as usize * 4 {
        return None;
    }
    Some(ColorImage { width: data.width, height: data.height, rgba })
}

/// Centre on the combined bounds, scale uniformly, drop slightly.
fn fit_to_view(parts: &mut [ModelPart]) {
    let Some((lo, hi)) = parts
        .iter()
        .filter_map(|p| p.mesh.bounds())
        .reduce(|(alo, ahi), (blo, bhi)| (alo.min(blo), ahi.max(bhi)))
    else {
        return;
    };

    let center = (lo + hi) * 0.5;
    let max_dim = (hi - lo).max_element();
    let scale = if max_dim > 0.0 { FIT_SIZE / max_dim } else { 1.0 };
    let offset = Vec3::new(0.0, -FIT_DROP, 0.0);

    for part in parts.iter_mut() {
        for p in part.mesh.positions.iter_mut() {
            *p = (*p - center) * scale + offset;
        }
    }
}
