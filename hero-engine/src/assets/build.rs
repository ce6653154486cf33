// build.rs - Turn a construction decision into a scene object
//
// Decode problems degrade one step at a time:
//   depth undecodable -> flat photo plane
//   depth 0x0         -> bulge
//   color undecodable -> no object (placeholder stays)
//   model unreadable  -> no object

use super::Construction;
use crate::config::PlaneConfig;
use crate::depth::{ColorImage, DepthBuffer, decode_color, decode_depth};
use crate::geometry::{Displacement, Model, ModelPart, build_displaced_plane, import_model, segments_for};
use crate::scene::{FinalKind, FinalObject, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Installed(FinalKind),
    Fallback,
}

/// Build the final object, or None when only the placeholder can be shown.
pub fn build_final(construction: &Construction, plane: &PlaneConfig) -> Option<FinalObject> {
    match construction {
        Construction::Model { mesh } => match import_model(mesh) {
            Ok(model) => Some(FinalObject {
                kind: FinalKind::Model,
                model,
                transform: Transform::default(),
            }),
            Err(err) => {
                log::warn!("keeping placeholder: {}", err);
                None
            }
        },
        Construction::Displaced { color, depth } => {
            let color = decode_or_warn(color, "color")?;
            match decode_depth(depth) {
                Ok(depth) => Some(photo_plane(color, Some(&depth), plane)),
                Err(err) => {
                    log::warn!("depth unreadable, showing flat photo: {}", err);
                    Some(photo_plane(color, None, plane))
                }
            }
        }
        Construction::Flat { color } => {
            let color = decode_or_warn(color, "color")?;
            Some(photo_plane(color, None, plane))
        }
        Construction::Fallback => None,
    }
}

fn decode_or_warn(bytes: &[u8], what: &str) -> Option<ColorImage> {
    decode_color(bytes)
        .map_err(|err| log::warn!("{} image unreadable: {}", what, err))
        .ok()
}

fn photo_plane(color: ColorImage, depth: Option<&DepthBuffer>, plane: &PlaneConfig) -> FinalObject {
    let (kind, displacement, (sx, sy)) = match depth {
        Some(d) if !d.is_empty() => (FinalKind::Displaced, Displacement::Depth(d), segments_for(d.width(), d.height())),
        Some(_) => (FinalKind::Bulge, Displacement::Bulge, segments_for(color.width, color.height)),
        None if plane.bulge_on_missing_depth => {
            (FinalKind::Bulge, Displacement::Bulge, segments_for(color.width, color.height))
        }
        // A flat plane needs no subdivision
        None => (FinalKind::Flat, Displacement::Flat, (1, 1)),
    };

    let mesh = build_displaced_plane(plane.width, color.aspect(), sx, sy, displacement, plane.depth_strength);
    log::info!("photo plane {:?}: {} vertices", kind, mesh.vertex_count());

    FinalObject {
        kind,
        model: Model {
            parts: vec![ModelPart {
                name: "photo".into(),
                mesh,
                base_color: [1.0; 4],
                texture: Some(0),
                accessory: false,
                visible: true,
            }],
            textures: vec![color],
        },
        transform: Transform::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Payload;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgba};
    use std::io::Cursor;

    fn encode(img: DynamicImage) -> Payload {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        Payload::from(out.into_inner())
    }

    fn color() -> Payload {
        encode(DynamicImage::ImageRgba8(ImageBuffer::from_pixel(8, 4, Rgba([200u8, 100, 50, 255]))))
    }

    fn depth() -> Payload {
        encode(DynamicImage::ImageLuma8(ImageBuffer::from_fn(8, 4, |x, _| Luma([(x * 30) as u8]))))
    }

    fn displaced_vertices(obj: &FinalObject) -> usize {
        obj.model.parts[0].mesh.positions.iter().filter(|p| p.z != 0.0).count()
    }

    #[test]
    fn both_images_give_displaced_plane() {
        let c = Construction::Displaced { color: color(), depth: depth() };
        let obj = build_final(&c, &PlaneConfig::default()).unwrap();
        assert_eq!(obj.kind, FinalKind::Displaced);
        assert_eq!(obj.model.parts[0].mesh.vertex_count(), 9 * 5);
        assert!(displaced_vertices(&obj) > 0);
        assert_eq!(obj.model.parts[0].texture, Some(0));
        assert_eq!(obj.model.textures.iter().map(|t| (t.width, t.height)).collect::<Vec<_>>(), vec![(8, 4)]);
    }

    #[test]
    fn unreadable_depth_gives_flat_plane() {
        let c = Construction::Displaced { color: color(), depth: Payload::from(&b"blocked"[..]) };
        let obj = build_final(&c, &PlaneConfig::default()).unwrap();
        assert_eq!(obj.kind, FinalKind::Flat);
        assert_eq!(displaced_vertices(&obj), 0);
    }

    #[test]
    fn missing_depth_can_bulge() {
        let plane = PlaneConfig { bulge_on_missing_depth: true, ..Default::default() };
        let obj = build_final(&Construction::Flat { color: color() }, &plane).unwrap();
        assert_eq!(obj.kind, FinalKind::Bulge);
        assert!(displaced_vertices(&obj) > 0);
    }

    #[test]
    fn unreadable_color_builds_nothing() {
        let bad = Payload::from(&b"nope"[..]);
        assert!(build_final(&Construction::Flat { color: bad.clone() }, &PlaneConfig::default()).is_none());
        assert!(build_final(&Construction::Displaced { color: bad, depth: depth() }, &PlaneConfig::default()).is_none());
    }

    #[test]
    fn bad_model_and_fallback_build_nothing() {
        let bad = Construction::Model { mesh: Payload::from(&b"nope"[..]) };
        assert!(build_final(&bad, &PlaneConfig::default()).is_none());
        assert!(build_final(&Construction::Fallback, &PlaneConfig::default()).is_none());
    }

    #[test]
    fn empty_depth_uses_bulge() {
        let color = decode_color(&color()).unwrap();
        let empty = DepthBuffer::from_luma(0, 0, vec![]).unwrap();
        let obj = photo_plane(color, Some(&empty), &PlaneConfig::default());
        assert_eq!(obj.kind, FinalKind::Bulge);
        assert!(displaced_vertices(&obj) > 0);
    }
}
