// pipeline.rs - Per-session asset slots and the coordination check
//
// Arrivals come in any order. `coordinate` is safe to call at any time;
// it returns a construction the first time one is possible and nothing
// after that.

use super::{AssetSlot, AssetState, Payload, Role};
use crate::config::Mode;
use crate::error::{HeroError, Result};

/// What to build once enough slots have settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Construction {
    /// Model mode, mesh arrived.
    Model { mesh: Payload },
    /// Photo mode, both images arrived.
    Displaced { color: Payload, depth: Payload },
    /// Photo mode, depth lost but color usable.
    Flat { color: Payload },
    /// Nothing usable. Keep the placeholder.
    Fallback,
}

#[derive(Debug)]
pub struct AssetPipeline {
    mode: Mode,
    slots: Vec<AssetSlot>,
    constructed: bool,
}

impl AssetPipeline {
    pub fn new(mode: Mode) -> Self {
        Self { mode, slots: Vec::with_capacity(2), constructed: false }
    }

    /// A construction has already been handed out.
    pub fn is_constructed(&self) -> bool { self.constructed }

    pub fn slot(&self, role: Role) -> Option<&AssetSlot> {
        self.slots.iter().find(|s| s.role == role)
    }

    /// Register a pending slot. Each role may be requested once per session.
    pub fn request(&mut self, role: Role, uri: impl Into<String>) -> Result<()> {
        if self.slot(role).is_some() {
            return Err(HeroError::AssetAlreadyRequested(role));
        }
        let uri = uri.into();
        log::debug!("requesting {} asset {}", role.as_str(), uri);
        self.slots.push(AssetSlot { role, uri, state: AssetState::Pending });
        Ok(())
    }

    /// Settle a slot, then run the coordination check.
    pub fn resolve(&mut self, role: Role, result: std::result::Result<Payload, String>) -> Result<Option<Construction>> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.role == role)
            .ok_or(HeroError::AssetNotRequested(role))?;
        if slot.is_settled() {
            return Err(HeroError::AssetAlreadySettled(role));
        }

        slot.state = match result {
            Ok(bytes) => {
                log::debug!("{} asset loaded ({} bytes)", role.as_str(), bytes.len());
                AssetState::Loaded(bytes)
            }
            Err(err) => {
                log::warn!("{} asset {} failed: {}", role.as_str(), slot.uri, err);
                AssetState::Failed(err)
            }
        };

        Ok(self.coordinate())
    }

    /// A role the mode needs but the host never configured counts as failed.
    pub fn mark_missing(&mut self, role: Role) -> Result<Option<Construction>> {
        self.request(role, "")?;
        self.resolve(role, Err("no uri configured".into()))
    }

    /// Decide what to build. Returns `Some` at most once.
    pub fn coordinate(&mut self) -> Option<Construction> {
        if self.constructed { return None; }

        let construction = match self.mode {
            Mode::Model => {
                let mesh = self.slot(Role::Mesh)?;
                match &mesh.state {
                    AssetState::Pending => return None,
                    AssetState::Loaded(bytes) => Construction::Model { mesh: bytes.clone() },
                    AssetState::Failed(_) => Construction::Fallback,
                }
            }
            Mode::PhotoDepth => {
                let color = self.slot(Role::Color)?;
                match &color.state {
                    // Color is fatal on its own, no need to wait for depth
                    AssetState::Failed(_) => Construction::Fallback,
                    AssetState::Pending => return None,
                    AssetState::Loaded(color) => {
                        let depth = self.slot(Role::Depth)?;
                        match &depth.state {
                            AssetState::Pending => return None,
                            AssetState::Loaded(depth) => {
                                Construction::Displaced { color: color.clone(), depth: depth.clone() }
                            }
                            AssetState::Failed(_) => Construction::Flat { color: color.clone() },
                        }
                    }
                }
            }
        };

        self.constructed = true;
        Some(construction)
    }
}
