// frame.rs - Two-state render loop
//
// The loop reschedules itself from inside each frame. `pending` tracks
// whether a frame request is outstanding so that resuming never starts a
// second chain next to one that has not fired yet.
//
// Suspending stops drawing only. Nothing is torn down.

use crate::scene::{Camera, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Active,
    Suspended,
}

/// Asks the host for one callback on the next display refresh.
pub trait FrameSource {
    fn request_frame(&mut self);
}

pub trait Clock {
    /// Seconds since the session started.
    fn elapsed_s(&self) -> f64;
    /// Local wall-clock hour, fractional (14.5 = 14:30).
    fn hour_of_day(&self) -> f64;
}

/// The drawing backend.
pub trait Renderer {
    fn resize(&mut self, width: u32, height: u32);
    fn draw(&mut self, scene: &Scene, camera: &Camera);
}

#[derive(Debug)]
pub struct FrameScheduler {
    state: LoopState,
    pending: bool,
    frames: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Starts Active: the canvas is assumed visible until told otherwise.
    pub fn new() -> Self {
        Self { state: LoopState::Active, pending: false, frames: 0 }
    }

    pub fn state(&self) -> LoopState { self.state }
    pub fn is_pending(&self) -> bool { self.pending }

    /// Iterations run so far.
    pub fn frames(&self) -> u64 { self.frames }

    pub fn start(&mut self, source: &mut dyn FrameSource) {
        if self.state == LoopState::Active {
            self.request(source);
        }
    }

    pub fn set_visible(&mut self, visible: bool, source: &mut dyn FrameSource) {
        match (self.state, visible) {
            (LoopState::Active, false) => {
                log::debug!("hero hidden, suspending");
                self.state = LoopState::Suspended;
            }
            (LoopState::Suspended, true) => {
                log::debug!("hero visible, resuming");
                self.state = LoopState::Active;
                self.request(source);
            }
            _ => {}
        }
    }

    /// A requested frame arrived. Returns true when one iteration should run,
    /// in which case the next frame has already been requested. A frame that
    /// lands while suspended ends the chain.
    pub fn on_frame(&mut self, source: &mut dyn FrameSource) -> bool {
        self.pending = false;
        if self.state == LoopState::Suspended {
            return false;
        }
        self.frames += 1;
        self.request(source);
        true
    }

    fn request(&mut self, source: &mut dyn FrameSource) {
        if !self.pending {
            self.pending = true;
            source.request_frame();
        }
    }
}
