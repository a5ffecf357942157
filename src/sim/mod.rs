//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per fixed step, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by creation order)
//! - No rendering, network or platform dependencies

pub mod collision;
pub mod entities;
pub mod params;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollectReport, EffectRequest, resolve_collectibles, resolve_obstacles};
pub use entities::EntityRegistry;
pub use params::{ParameterStore, RemoteConfig, RevivalReasons, SavedSession, SessionGrant, SessionParameters};
pub use state::{
    Arena, Bird, EffectColor, EndCause, GameState, Particle, Pickup, PickupKind, Pipe, RunPhase,
    SessionState, Verdict,
};
pub use tick::{TickInput, tick};

#[cfg(test)]
pub(crate) mod fixtures;
