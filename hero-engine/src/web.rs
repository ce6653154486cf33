// web.rs - Browser bootstrap
//
// Wires a HeroSession to the page: canvas lookup, asset fetches, mouse,
// visibility, the glasses button and requestAnimationFrame. Drawing is
// forwarded to a renderer object supplied by the page script.
//
// Geometry and materials go up once per scene generation:
//   uploadTexture(index, w, h, rgba)  one per Model::textures entry
//   upload(part, ..., base_color, texture)  texture is -1 when untextured
//
// Uniform block passed to `draw` (f32, in order):
//   16  view-projection matrix, column-major
//   16  object matrix
//    4  tint rgb + failed flag (1.0 = fallback)
//   24  3 lights x [kind, r, g, b, intensity, x, y, z]
//    n  per-part visibility, 1.0 or 0.0

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Element, HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, Performance, Window,
};

use crate::assets::{AssetFetcher, Payload, Role};
use crate::config::HeroConfig;
use crate::frame::{Clock, FrameSource, Renderer};
use crate::geometry::{Mesh, Topology};
use crate::scene::{Camera, LightKind, Scene, SceneNode};
use crate::session::HeroSession;

#[wasm_bindgen]
extern "C" {
    /// Drawing backend implemented by the page.
    pub type HostRenderer;

    #[wasm_bindgen(method)]
    fn resize(this: &HostRenderer, width: u32, height: u32);

    #[wasm_bindgen(method)]
    fn upload(
        this: &HostRenderer,
        part: u32,
        positions: &[f32],
        normals: &[f32],
        uvs: &[f32],
        indices: &[u32],
        lines: bool,
        base_color: &[f32],
        texture: i32,
    );

    #[wasm_bindgen(method, js_name = uploadTexture)]
    fn upload_texture(this: &HostRenderer, index: u32, width: u32, height: u32, rgba: &[u8]);

    #[wasm_bindgen(method)]
    fn draw(this: &HostRenderer, uniforms: &[f32]);
}

/// Build the hero into the configured canvas. Pages without the canvas
/// get nothing.
#[wasm_bindgen]
pub fn start(config_json: &str, renderer: HostRenderer) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let config = HeroConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let Some(element) = document.get_element_by_id(&config.canvas_id) else {
        log::info!("no #{} on this page, hero disabled", config.canvas_id);
        return Ok(());
    };
    let canvas: HtmlCanvasElement = element
        .dyn_into()
        .map_err(|_| JsValue::from_str("hero element is not a canvas"))?;
    let performance = window.performance().ok_or_else(|| JsValue::from_str("no performance timer"))?;

    let toggle = document.get_element_by_id(&config.toggle_id);
    let threshold = config.visibility_threshold;

    let hero = Rc::new(Hero {
        session: RefCell::new(HeroSession::new(config)),
        renderer: RefCell::new(JsRenderer { host: renderer, uploaded: None }),
        frames: RefCell::new(AnimationFrames { window: window.clone(), callback: Rc::new(RefCell::new(None)) }),
        clock: BrowserClock { origin_ms: performance.now(), performance },
        canvas,
        toggle,
        shown_accessory: Cell::new(None),
    });

    hero.session
        .borrow_mut()
        .start_loading(&mut HttpFetcher { hero: hero.clone() })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    install_frame_loop(&hero);
    install_pointer(&hero, &window)?;
    install_visibility(&hero, threshold)?;
    install_toggle(&hero)?;

    hero.session.borrow_mut().start(&mut *hero.frames.borrow_mut());
    Ok(())
}

struct Hero {
    session: RefCell<HeroSession>,
    renderer: RefCell<JsRenderer>,
    frames: RefCell<AnimationFrames>,
    clock: BrowserClock,
    canvas: HtmlCanvasElement,
    toggle: Option<Element>,
    // Last state written to the button
    shown_accessory: Cell<Option<bool>>,
}

impl Hero {
    fn canvas_size(&self) -> (u32, u32) {
        (self.canvas.client_width().max(0) as u32, self.canvas.client_height().max(0) as u32)
    }

    fn sync_toggle(&self) {
        let visible = self.session.borrow().accessory_visible();
        if self.shown_accessory.get() == Some(visible) {
            return;
        }
        self.shown_accessory.set(Some(visible));

        let Some(button) = &self.toggle else { return };
        if let Err(err) = button.set_attribute("aria-pressed", if visible { "true" } else { "false" }) {
            log::warn!("aria-pressed: {:?}", err);
        }
        if let Ok(Some(label)) = button.query_selector("span") {
            label.set_text_content(Some(if visible { "Glasses" } else { "No Glasses" }));
        }
    }
}

fn install_frame_loop(hero: &Rc<Hero>) {
    let callback = hero.frames.borrow().callback.clone();
    let h = hero.clone();
    *callback.borrow_mut() = Some(Closure::new(move || {
        let size = h.canvas_size();
        h.session.borrow_mut().on_frame(
            &mut *h.frames.borrow_mut(),
            &h.clock,
            size,
            &mut *h.renderer.borrow_mut(),
        );
        h.sync_toggle();
    }));
}

fn install_pointer(hero: &Rc<Hero>, window: &Window) -> Result<(), JsValue> {
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let h = hero.clone();
    let w = window.clone();
    let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let (vw, vh) = viewport(&w);
        let schedule = h.session.borrow_mut().on_pointer(event.client_x() as f32, event.client_y() as f32, vw, vh);
        if schedule {
            let hc = h.clone();
            let commit = Closure::once_into_js(move || hc.session.borrow_mut().commit_pointer());
            if let Err(err) = w.request_animation_frame(commit.unchecked_ref()) {
                log::warn!("pointer commit: {:?}", err);
            }
        }
    });
    document.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();
    Ok(())
}

fn install_visibility(hero: &Rc<Hero>, threshold: f64) -> Result<(), JsValue> {
    let h = hero.clone();
    let on_intersect = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
        let visible = entries
            .get(0)
            .dyn_into::<IntersectionObserverEntry>()
            .map(|entry| entry.is_intersecting())
            .unwrap_or(false);
        h.session.borrow_mut().set_visible(visible, &mut *h.frames.borrow_mut());
    });

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
    observer.observe(&hero.canvas);
    on_intersect.forget();
    Ok(())
}

fn install_toggle(hero: &Rc<Hero>) -> Result<(), JsValue> {
    let Some(button) = &hero.toggle else { return Ok(()) };
    let h = hero.clone();
    let on_click = Closure::<dyn FnMut()>::new(move || {
        let visible = h.session.borrow_mut().toggle_accessory();
        log::debug!("glasses toggled {}", if visible { "on" } else { "off" });
        h.sync_toggle();
    });
    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn viewport(window: &Window) -> (f32, f32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    (w as f32, h as f32)
}

struct HttpFetcher {
    hero: Rc<Hero>,
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&mut self, role: Role, uri: &str) {
        let hero = self.hero.clone();
        let uri = uri.to_string();
        spawn_local(async move {
            let result = fetch_bytes(&uri).await;
            hero.session.borrow_mut().on_asset(role, result);
            hero.sync_toggle();
        });
    }
}

async fn fetch_bytes(uri: &str) -> Result<Payload, String> {
    let resp = Request::get(uri).send().await.map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {} for {}", resp.status(), uri));
    }
    let bytes = resp.binary().await.map_err(|e| e.to_string())?;
    Ok(Payload::from(bytes))
}

struct AnimationFrames {
    window: Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameSource for AnimationFrames {
    fn request_frame(&mut self) {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else { return };
        if let Err(err) = self.window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame: {:?}", err);
        }
    }
}

struct BrowserClock {
    performance: Performance,
    origin_ms: f64,
}

impl Clock for BrowserClock {
    fn elapsed_s(&self) -> f64 {
        (self.performance.now() - self.origin_ms) / 1000.0
    }

    fn hour_of_day(&self) -> f64 {
        let now = js_sys::Date::new_0();
        now.get_hours() as f64 + now.get_minutes() as f64 / 60.0
    }
}

struct JsRenderer {
    host: HostRenderer,
    // Scene generation whose meshes the host currently holds
    uploaded: Option<u64>,
}

impl JsRenderer {
    fn upload_scene(&self, scene: &Scene) {
        for node in scene.nodes() {
            match node {
                SceneNode::Placeholder(p) => self.upload_mesh(0, &p.mesh, &[1.0; 4], None),
                SceneNode::Final(object) => {
                    for (i, texture) in object.model.textures.iter().enumerate() {
                        self.host.upload_texture(i as u32, texture.width, texture.height, &texture.rgba);
                    }
                    for (i, part) in object.model.parts.iter().enumerate() {
                        self.upload_mesh(i as u32, &part.mesh, &part.base_color, part.texture);
                    }
                }
                SceneNode::Light(_) => {}
            }
        }
    }

    fn upload_mesh(&self, part: u32, mesh: &Mesh, base_color: &[f32; 4], texture: Option<usize>) {
        let positions: Vec<f32> = mesh.positions.iter().flat_map(|p| p.to_array()).collect();
        let normals: Vec<f32> = mesh.normals.iter().flat_map(|n| n.to_array()).collect();
        let uvs: Vec<f32> = mesh.uvs.iter().flat_map(|uv| uv.to_array()).collect();
        let lines = mesh.topology == Topology::Lines;
        let texture = texture.map_or(-1, |t| t as i32);
        self.host.upload(part, &positions, &normals, &uvs, &mesh.indices, lines, base_color, texture);
    }
}

impl Renderer for JsRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.host.resize(width, height);
    }

    fn draw(&mut self, scene: &Scene, camera: &Camera) {
        if self.uploaded != Some(scene.generation()) {
            self.upload_scene(scene);
            self.uploaded = Some(scene.generation());
        }
        self.host.draw(&uniforms(scene, camera));
    }
}

fn uniforms(scene: &Scene, camera: &Camera) -> Vec<f32> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(&camera.view_projection().to_cols_array());

    let mut visibility = Vec::new();
    for node in scene.nodes() {
        match node {
            SceneNode::Placeholder(p) => {
                out.extend_from_slice(&p.transform.matrix().to_cols_array());
                out.extend_from_slice(&p.color.to_array());
                out.push(if p.failed { 1.0 } else { 0.0 });
                visibility.push(1.0);
            }
            SceneNode::Final(object) => {
                out.extend_from_slice(&object.transform.matrix().to_cols_array());
                out.extend_from_slice(&[1.0, 1.0, 1.0, 0.0]);
                visibility.extend(object.model.parts.iter().map(|p| if p.visible { 1.0 } else { 0.0 }));
            }
            SceneNode::Light(_) => {}
        }
    }

    for light in scene.lights() {
        let kind = match light.kind {
            LightKind::Ambient => 0.0,
            LightKind::Directional => 1.0,
            LightKind::Point { .. } => 2.0,
        };
        out.push(kind);
        out.extend_from_slice(&light.color.to_array());
        out.push(light.intensity);
        out.extend_from_slice(&light.position.to_array());
    }

    out.extend(visibility);
    out
}
