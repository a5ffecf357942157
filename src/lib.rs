//! Flappy Rewards - a remotely tuned Flappy Bird arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, run lifecycle)
//! - `api`: Parameter sync and session reporting protocol
//! - `renderer`: Canvas2D drawing (browser only)
//! - `session`: Run lifecycle and sync integration
//! - `settings`: Client configuration persisted in LocalStorage
//! - `ui`: HUD text and button state derived from the simulation

pub mod api;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{GameError, Result};
pub use session::SessionController;
pub use settings::{ClientSettings, RevivePolicy};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh on most screens)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default arena used before the canvas reports its size
    pub const DEFAULT_ARENA_WIDTH: f32 = 800.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 600.0;

    /// Bird defaults
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_WIDTH: f32 = 30.0;
    pub const BIRD_HEIGHT: f32 = 25.0;
    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.15;
    /// Velocity set by a flap (negative = up)
    pub const JUMP_POWER: f32 = -4.5;

    /// Pipe geometry
    pub const PIPE_WIDTH: f32 = 60.0;
    /// Smallest visible segment above or below the gap
    pub const PIPE_MIN_SEGMENT: f32 = 50.0;
    /// First pipe is never closer than this to the bird
    pub const FIRST_PIPE_MIN_LEAD: f32 = 200.0;

    /// Scroll speed
    pub const MAX_PIPE_SPEED: f32 = 2.0;
    pub const SPEED_INCREASE_PER_POINT: f32 = 0.02;
    /// `bird_speed` from the backend is divided by this to get pixels per tick
    pub const BIRD_SPEED_DIVISOR: f32 = 20.0;

    /// Pickups
    pub const COIN_SIZE: f32 = 20.0;
    pub const COUPON_WIDTH: f32 = 30.0;
    pub const COUPON_HEIGHT: f32 = 25.0;
    pub const COIN_SPAWN_CHANCE: f64 = 0.9;
    pub const COUPON_SPAWN_CHANCE: f64 = 0.15;
    /// Horizontal offsets from the pipe's left edge
    pub const COIN_OFFSET_X: f32 = 100.0;
    pub const COUPON_OFFSET_X: f32 = 150.0;
    /// Coupons keep this margin from the top and bottom of the arena
    pub const COUPON_MARGIN_Y: f32 = 50.0;

    /// Revive clears pipes whose left edge lies in (bird.x - BEHIND, bird.x + AHEAD)
    pub const REVIVE_CLEAR_BEHIND: f32 = 50.0;
    pub const REVIVE_CLEAR_AHEAD: f32 = 100.0;
    /// Local revive pool size for a fresh session
    pub const DEFAULT_REVIVE_POOL: u32 = 5;

    /// Particle bursts
    pub const PARTICLE_LIFE_TICKS: u32 = 30;
    pub const PARTICLE_MAX_SPEED: f32 = 2.0;
    pub const COIN_BURST: usize = 8;
    pub const COUPON_BURST: usize = 10;
    pub const REVIVE_BURST: usize = 15;
    pub const CRASH_BURST: usize = 12;
    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 256;
}
