// scenarios.rs - Whole-session behaviour against fake host collaborators

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgba};
use pretty_assertions::assert_eq;

use super::HeroSession;
use crate::assets::{AssetFetcher, BuildOutcome, Payload, Role};
use crate::config::{HeroConfig, LightingConfig, Mode};
use crate::frame::{Clock, FrameSource, LoopState, Renderer};
use crate::geometry::testdata::two_node_gltf;
use crate::scene::{Camera, FinalKind, Scene, SceneNode};

#[derive(Default)]
struct Fetches(Vec<Role>);

impl AssetFetcher for Fetches {
    fn fetch(&mut self, role: Role, _uri: &str) {
        self.0.push(role);
    }
}

#[derive(Default)]
struct Refresh {
    requested: u32,
}

impl FrameSource for Refresh {
    fn request_frame(&mut self) {
        self.requested += 1;
    }
}

struct FixedClock {
    elapsed: f64,
    hour: f64,
}

impl Clock for FixedClock {
    fn elapsed_s(&self) -> f64 { self.elapsed }
    fn hour_of_day(&self) -> f64 { self.hour }
}

#[derive(Debug, Clone, PartialEq)]
struct Drawn {
    aspect: f32,
    generation: u64,
    final_kind: Option<FinalKind>,
}

#[derive(Default)]
struct Recorder {
    resizes: Vec<(u32, u32)>,
    draws: Vec<Drawn>,
}

impl Renderer for Recorder {
    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn draw(&mut self, scene: &Scene, camera: &Camera) {
        self.draws.push(Drawn {
            aspect: camera.aspect,
            generation: scene.generation(),
            final_kind: scene.final_object().map(|f| f.kind),
        });
    }
}

fn png(img: DynamicImage) -> Payload {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    Payload::from(out.into_inner())
}

fn color_png() -> Payload {
    png(DynamicImage::ImageRgba8(ImageBuffer::from_pixel(16, 8, Rgba([180u8, 120, 90, 255]))))
}

fn depth_png() -> Payload {
    png(DynamicImage::ImageLuma8(ImageBuffer::from_fn(16, 8, |x, y| Luma([(x * 8 + y * 4) as u8]))))
}

fn photo_session() -> (HeroSession, Fetches) {
    let config = HeroConfig {
        mode: Mode::PhotoDepth,
        color_uri: Some("assets/me.jpg".into()),
        depth_uri: Some("assets/me.depth.png".into()),
        ..Default::default()
    };
    let mut session = HeroSession::new(config);
    let mut fetches = Fetches::default();
    assert_eq!(session.start_loading(&mut fetches).unwrap(), None);
    (session, fetches)
}

fn part_visible(session: &HeroSession, name: &str) -> bool {
    let object = session.scene().final_object().unwrap();
    object.model.parts.iter().find(|p| p.name == name).unwrap().visible
}

fn finals(session: &HeroSession) -> usize {
    session.scene().nodes().iter().filter(|n| matches!(n, SceneNode::Final(_))).count()
}

fn placeholders(session: &HeroSession) -> usize {
    session.scene().nodes().iter().filter(|n| matches!(n, SceneNode::Placeholder(_))).count()
}

#[test]
fn both_images_build_one_displaced_plane() {
    let (mut session, fetches) = photo_session();
    assert_eq!(fetches.0, vec![Role::Color, Role::Depth]);

    assert_eq!(session.on_asset(Role::Depth, Ok(depth_png())), None);
    let outcome = session.on_asset(Role::Color, Ok(color_png()));
    assert_eq!(outcome, Some(BuildOutcome::Installed(FinalKind::Displaced)));

    let object = session.scene().final_object().unwrap();
    let part = &object.model.parts[0];
    assert_eq!(part.mesh.vertex_count(), 17 * 9);
    assert!(part.mesh.positions.iter().any(|p| p.z > 0.0));
    assert_eq!(part.texture, Some(0));
    assert_eq!(object.model.textures.len(), 1);
}

#[test]
fn construction_trigger_is_idempotent() {
    let (mut session, _) = photo_session();
    session.on_asset(Role::Color, Ok(color_png()));
    session.on_asset(Role::Depth, Ok(depth_png()));
    let generation = session.scene().generation();

    assert_eq!(session.coordinate(), None);
    assert_eq!(session.coordinate(), None);
    // A duplicate arrival is rejected before it can trigger anything
    assert_eq!(session.on_asset(Role::Depth, Ok(depth_png())), None);

    assert_eq!(finals(&session), 1);
    assert_eq!(placeholders(&session), 0);
    assert_eq!(session.scene().generation(), generation);
}

#[test]
fn depth_failure_shows_flat_photo() {
    for depth_first in [true, false] {
        let (mut session, _) = photo_session();
        let outcome = if depth_first {
            assert_eq!(session.on_asset(Role::Depth, Err("404".into())), None);
            session.on_asset(Role::Color, Ok(color_png()))
        } else {
            assert_eq!(session.on_asset(Role::Color, Ok(color_png())), None);
            session.on_asset(Role::Depth, Err("404".into()))
        };
        assert_eq!(outcome, Some(BuildOutcome::Installed(FinalKind::Flat)));

        let object = session.scene().final_object().unwrap();
        let displaced = object.model.parts[0].mesh.positions.iter().filter(|p| p.z != 0.0).count();
        assert_eq!(displaced, 0);
        assert_eq!(object.model.parts[0].texture, Some(0));

        // Placeholder removed exactly once
        assert_eq!(placeholders(&session), 0);
        assert_eq!(session.scene().generation(), 1);
    }
}

#[test]
fn undecodable_depth_shows_flat_photo() {
    let (mut session, _) = photo_session();
    session.on_asset(Role::Color, Ok(color_png()));
    let outcome = session.on_asset(Role::Depth, Ok(Payload::from(&b"tainted"[..])));
    assert_eq!(outcome, Some(BuildOutcome::Installed(FinalKind::Flat)));
}

#[test]
fn total_failure_keeps_only_the_fallback() {
    let (mut session, _) = photo_session();
    let mut refresh = Refresh::default();
    let mut renderer = Recorder::default();
    let clock = FixedClock { elapsed: 0.0, hour: 9.0 };
    session.start(&mut refresh);

    assert_eq!(session.on_asset(Role::Color, Err("404".into())), Some(BuildOutcome::Fallback));
    session.on_frame(&mut refresh, &clock, (400, 300), &mut renderer);
    assert_eq!(session.on_asset(Role::Depth, Err("404".into())), None);
    session.on_frame(&mut refresh, &clock, (400, 300), &mut renderer);

    assert_eq!(finals(&session), 0);
    assert_eq!(placeholders(&session), 1);
    assert!(session.scene().placeholder().unwrap().failed);
    assert!(renderer.draws.iter().all(|d| d.final_kind.is_none()));
    assert_eq!(renderer.draws.len(), 2);
}

#[test]
fn hidden_canvas_stops_drawing_until_visible() {
    let (mut session, fetches) = photo_session();
    session.on_asset(Role::Color, Ok(color_png()));
    session.on_asset(Role::Depth, Ok(depth_png()));
    let generation = session.scene().generation();

    let mut refresh = Refresh::default();
    let mut renderer = Recorder::default();
    let mut clock = FixedClock { elapsed: 0.0, hour: 12.0 };

    session.start(&mut refresh);
    for _ in 0..3 {
        clock.elapsed += 1.0 / 60.0;
        assert!(session.on_frame(&mut refresh, &clock, (400, 300), &mut renderer));
    }
    assert_eq!(renderer.draws.len(), 3);

    session.set_visible(false, &mut refresh);
    assert_eq!(session.scheduler().state(), LoopState::Suspended);
    // The frame already in flight lands but draws nothing and ends the chain
    let requested = refresh.requested;
    assert!(!session.on_frame(&mut refresh, &clock, (400, 300), &mut renderer));
    assert_eq!(refresh.requested, requested);
    assert_eq!(renderer.draws.len(), 3);

    session.set_visible(true, &mut refresh);
    assert_eq!(refresh.requested, requested + 1);
    assert!(session.on_frame(&mut refresh, &clock, (400, 300), &mut renderer));
    assert_eq!(renderer.draws.len(), 4);

    // Nothing reloaded, nothing rebuilt
    assert_eq!(fetches.0.len(), 2);
    assert_eq!(session.scene().generation(), generation);
    assert!(renderer.draws.iter().all(|d| d.final_kind == Some(FinalKind::Displaced)));
}

#[test]
fn resize_applies_before_the_draw() {
    let mut session = HeroSession::new(HeroConfig::default());
    let mut renderer = Recorder::default();

    session.frame(0.0, 12.0, (400, 300), &mut renderer);
    session.frame(0.016, 12.0, (800, 600), &mut renderer);
    session.frame(0.033, 12.0, (800, 600), &mut renderer);

    assert_eq!(renderer.resizes, vec![(400, 300), (800, 600)]);
    let aspects: Vec<f32> = renderer.draws.iter().map(|d| d.aspect).collect();
    assert_eq!(aspects, vec![400.0 / 300.0, 800.0 / 600.0, 800.0 / 600.0]);
}

#[test]
fn sun_holds_between_refreshes() {
    let mut session = HeroSession::new(HeroConfig::default());
    let mut renderer = Recorder::default();

    session.frame(0.0, 12.0, (400, 300), &mut renderer);
    let noon = session.scene().sun().unwrap().intensity;
    session.frame(0.5, 0.0, (400, 300), &mut renderer);
    assert_eq!(session.scene().sun().unwrap().intensity, noon);
    session.frame(1.0, 0.0, (400, 300), &mut renderer);
    assert!(session.scene().sun().unwrap().intensity < noon);
}

#[test]
fn pointer_tilts_the_final_object() {
    let (mut session, _) = photo_session();
    session.on_asset(Role::Color, Ok(color_png()));
    session.on_asset(Role::Depth, Ok(depth_png()));
    let mut renderer = Recorder::default();

    session.frame(0.0, 12.0, (400, 300), &mut renderer);
    let rest = session.scene().final_object().unwrap().transform.rotation;
    assert!((rest.x - 0.03).abs() < 1e-6);
    assert_eq!(rest.y, 0.0);

    // Far right and top of the viewport
    assert!(session.on_pointer(1000.0, 0.0, 1000.0, 800.0));
    assert!(!session.on_pointer(1000.0, 0.0, 1000.0, 800.0));
    session.commit_pointer();
    session.frame(0.0, 12.0, (400, 300), &mut renderer);

    let tilted = session.scene().final_object().unwrap().transform.rotation;
    assert!(tilted.y > rest.y);
    assert!(tilted.x < rest.x);
    let sun = session.scene().sun().unwrap().position;
    assert!(sun.x > 0.0 && sun.y > 0.0);
}

#[test]
fn accessory_toggle_overrides_lighting() {
    let mut session = HeroSession::new(HeroConfig::default());
    let mut renderer = Recorder::default();
    assert!(session.accessory_visible());

    assert!(!session.toggle_accessory());
    // Bright noon would show it again if the rule were still automatic
    session.frame(0.0, 12.0, (400, 300), &mut renderer);
    assert!(!session.accessory_visible());
}

#[test]
fn glasses_follow_the_sun_until_toggled() {
    let config = HeroConfig {
        lighting: LightingConfig { accessory_threshold: 4.0, ..Default::default() },
        ..Default::default()
    };
    let mut session = HeroSession::new(config);
    let mut renderer = Recorder::default();
    let mut fetches = Fetches::default();
    session.start_loading(&mut fetches).unwrap();
    assert_eq!(fetches.0, vec![Role::Mesh]);

    let model = Payload::from(two_node_gltf("Glasses").as_bytes());
    assert_eq!(session.on_asset(Role::Mesh, Ok(model)), Some(BuildOutcome::Installed(FinalKind::Model)));

    // Midnight sits below the threshold
    session.frame(0.0, 0.0, (400, 300), &mut renderer);
    assert!(!part_visible(&session, "Glasses"));
    assert!(part_visible(&session, "Head"));
    assert!(!session.accessory_visible());

    assert!(session.toggle_accessory());
    assert!(part_visible(&session, "Glasses"));
    session.frame(2.0, 0.0, (400, 300), &mut renderer);
    assert!(part_visible(&session, "Glasses"));

    assert!(!session.toggle_accessory());
    session.frame(4.0, 12.0, (400, 300), &mut renderer);
    assert_eq!(session.scene().sun().unwrap().intensity, 5.0);
    assert!(!part_visible(&session, "Glasses"));
    assert!(part_visible(&session, "Head"));
    assert_eq!(renderer.draws.len(), 3);
}
