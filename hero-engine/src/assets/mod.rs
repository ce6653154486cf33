// assets/ - Asset slots and load coordination
//
// Each role is a tiny state machine: Pending -> Loaded | Failed, exactly
// once. The pipeline runs one coordination check after every transition
// and hands out at most one construction per session.

mod build;
mod pipeline;

pub use build::{BuildOutcome, build_final};
pub use pipeline::{AssetPipeline, Construction};

use std::rc::Rc;

use crate::config::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Color,
    Depth,
    Mesh,
}

impl Role {
    /// Roles the mode cannot build without (or degrades without, for depth).
    pub fn required(mode: Mode) -> &'static [Role] {
        match mode {
            Mode::Model => &[Role::Mesh],
            Mode::PhotoDepth => &[Role::Color, Role::Depth],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Color => "color",
            Role::Depth => "depth",
            Role::Mesh => "mesh",
        }
    }
}

/// Fetched bytes. Shared, never mutated after arrival.
pub type Payload = Rc<[u8]>;

#[derive(Debug, Clone, PartialEq)]
pub enum AssetState {
    Pending,
    Loaded(Payload),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AssetSlot {
    pub role: Role,
    pub uri: String,
    pub state: AssetState,
}

impl AssetSlot {
    pub fn is_settled(&self) -> bool {
        !matches!(self.state, AssetState::Pending)
    }

    pub fn payload(&self) -> Option<&Payload> {
        match &self.state {
            AssetState::Loaded(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn failed(&self) -> bool {
        matches!(self.state, AssetState::Failed(_))
    }
}

/// Host side of `request`: starts a fetch whose result comes back later
/// through `HeroSession::on_asset`.
pub trait AssetFetcher {
    fn fetch(&mut self, role: Role, uri: &str);
}
