// session/ - One hero instance
//
// Owns everything a page load needs: asset slots, scene, camera, pointer,
// sun and the frame scheduler. Host callbacks (fetch completions, input,
// visibility, display refresh) all funnel into methods here.

use glam::Vec3;

use crate::assets::{AssetFetcher, AssetPipeline, BuildOutcome, Construction, Payload, Role, build_final};
use crate::config::{HeroConfig, Mode};
use crate::error::Result;
use crate::frame::{Clock, FrameScheduler, FrameSource, Renderer};
use crate::geometry::{wire_cube, wire_sphere};
use crate::lighting::{AccessoryRule, SunClock};
use crate::pointer::PointerTracker;
use crate::scene::{Camera, Placeholder, Scene};

/// Sun position at full pointer deflection.
const SUN_REACH: Vec3 = Vec3::new(2.5, 2.0, 2.5);

#[cfg(test)]
mod scenarios;

pub struct HeroSession {
    config: HeroConfig,
    pipeline: AssetPipeline,
    scene: Scene,
    camera: Camera,
    pointer: PointerTracker,
    sun: SunClock,
    accessory: AccessoryRule,
    scheduler: FrameScheduler,
    canvas: Option<(u32, u32)>,
}

impl HeroSession {
    pub fn new(config: HeroConfig) -> Self {
        // Cube for models, sphere for photos
        let indicator = match config.mode {
            Mode::Model => wire_cube(0.5),
            Mode::PhotoDepth => wire_sphere(0.5, 16, 12),
        };

        Self {
            pipeline: AssetPipeline::new(config.mode),
            scene: Scene::new(Placeholder::new(indicator)),
            camera: Camera::new(&config.camera, 1.0),
            pointer: PointerTracker::new(config.pointer_rate),
            sun: SunClock::new(config.lighting.refresh_interval_s),
            accessory: AccessoryRule::new(config.lighting.accessory_threshold),
            scheduler: FrameScheduler::new(),
            canvas: None,
            config,
        }
    }

    pub fn config(&self) -> &HeroConfig { &self.config }
    pub fn scene(&self) -> &Scene { &self.scene }
    pub fn camera(&self) -> &Camera { &self.camera }
    pub fn pointer(&self) -> &PointerTracker { &self.pointer }
    pub fn scheduler(&self) -> &FrameScheduler { &self.scheduler }
    pub fn accessory_visible(&self) -> bool { self.accessory.visible() }

    /// Request every asset the mode needs. Roles without a configured URI
    /// fail on the spot. May only be called once per session.
    pub fn start_loading(&mut self, fetcher: &mut dyn AssetFetcher) -> Result<Option<BuildOutcome>> {
        let mut outcome = None;
        for &role in Role::required(self.config.mode) {
            // Settled early by a missing URI, nothing more to fetch
            if self.pipeline.is_constructed() {
                break;
            }
            let uri = match role {
                Role::Color => self.config.color_uri.clone(),
                Role::Depth => self.config.depth_uri.clone(),
                Role::Mesh => self.config.model_uri.clone(),
            };
            let construction = match uri.filter(|u| !u.is_empty()) {
                Some(uri) => {
                    self.pipeline.request(role, uri.as_str())?;
                    fetcher.fetch(role, &uri);
                    None
                }
                None => {
                    log::warn!("no {} uri configured", role.as_str());
                    self.pipeline.mark_missing(role)?
                }
            };
            if let Some(c) = construction {
                outcome = Some(self.construct(c));
            }
        }
        Ok(outcome)
    }

    /// A fetch finished. Returns what was built if this arrival completed
    /// the set; stray or repeated arrivals are logged and ignored.
    pub fn on_asset(&mut self, role: Role, result: std::result::Result<Payload, String>) -> Option<BuildOutcome> {
        match self.pipeline.resolve(role, result) {
            Ok(Some(construction)) => Some(self.construct(construction)),
            Ok(None) => None,
            Err(err) => {
                log::warn!("ignoring {} arrival: {}", role.as_str(), err);
                None
            }
        }
    }

    /// Run the coordination check outside of an arrival. Does nothing once
    /// a construction has been handed out.
    pub fn coordinate(&mut self) -> Option<BuildOutcome> {
        let construction = self.pipeline.coordinate()?;
        Some(self.construct(construction))
    }

    fn construct(&mut self, construction: Construction) -> BuildOutcome {
        let Some(mut object) = build_final(&construction, &self.config.plane) else {
            log::warn!("no usable assets, keeping fallback indicator");
            self.scene.fail_placeholder();
            return BuildOutcome::Fallback;
        };

        let kind = object.kind;
        if object.model.accessory_count() > 0 {
            object.model.set_accessory_visible(self.accessory.visible());
        }
        self.scene.install_final(object);
        log::info!("hero ready: {:?}", kind);
        BuildOutcome::Installed(kind)
    }

    /// Raw cursor sample in viewport pixels. True means: schedule one
    /// `commit_pointer` for the next refresh.
    pub fn on_pointer(&mut self, px: f32, py: f32, viewport_w: f32, viewport_h: f32) -> bool {
        self.pointer.on_raw_input(px, py, viewport_w, viewport_h)
    }

    pub fn commit_pointer(&mut self) {
        self.pointer.commit();
    }

    /// User pressed the accessory button. Returns the new visibility.
    pub fn toggle_accessory(&mut self) -> bool {
        let visible = self.accessory.toggle();
        self.show_accessory(visible);
        visible
    }

    fn show_accessory(&mut self, visible: bool) {
        if let Some(object) = self.scene.final_object_mut() {
            object.model.set_accessory_visible(visible);
        }
    }

    pub fn start(&mut self, source: &mut dyn FrameSource) {
        self.scheduler.start(source);
    }

    pub fn set_visible(&mut self, visible: bool, source: &mut dyn FrameSource) {
        self.scheduler.set_visible(visible, source);
    }

    /// Display refresh callback. Runs one iteration unless suspended.
    pub fn on_frame(
        &mut self,
        source: &mut dyn FrameSource,
        clock: &dyn Clock,
        canvas: (u32, u32),
        renderer: &mut dyn Renderer,
    ) -> bool {
        if !self.scheduler.on_frame(source) {
            return false;
        }
        self.frame(clock.elapsed_s(), clock.hour_of_day(), canvas, renderer);
        true
    }

    /// One loop iteration: resize, ease, relight, animate, draw once.
    pub fn frame(&mut self, elapsed_s: f64, hour: f64, canvas: (u32, u32), renderer: &mut dyn Renderer) {
        let size = (canvas.0.max(1), canvas.1.max(1));
        if self.canvas != Some(size) {
            renderer.resize(size.0, size.1);
            self.camera.set_viewport(size.0, size.1);
            self.canvas = Some(size);
        }

        self.pointer.tick();

        if let Some(sample) = self.sun.refresh(elapsed_s, hour, &self.config.lighting) {
            if let Some(sun) = self.scene.sun_mut() {
                sun.color = sample.color;
                sun.intensity = sample.intensity;
            }
            if let Some(visible) = self.accessory.observe(sample.intensity) {
                log::debug!("accessory auto-{}", if visible { "shown" } else { "hidden" });
                self.show_accessory(visible);
            }
        }

        let t = elapsed_s as f32;
        let p = self.pointer.position();
        let motion = &self.config.motion;

        if let Some(placeholder) = self.scene.placeholder_mut() {
            placeholder.transform.rotation =
                Vec3::new(motion.placeholder_spin[0] * t, motion.placeholder_spin[1] * t, 0.0);
        }
        if let Some(object) = self.scene.final_object_mut() {
            let yaw = motion.spin_rate * t + motion.wobble_amp * (motion.wobble_rate * t).sin() + p.x * motion.pointer_tilt;
            let pitch = motion.nod_amp * (motion.nod_rate * t).cos() - p.y * motion.pointer_tilt;
            object.transform.rotation = Vec3::new(pitch, yaw, 0.0);
        }
        if let Some(sun) = self.scene.sun_mut() {
            sun.position = Vec3::new(p.x, p.y, 1.0) * SUN_REACH;
        }

        renderer.draw(&self.scene, &self.camera);
    }
}
