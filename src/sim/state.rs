//! Game state and core simulation types
//!
//! One owned aggregate (`GameState`) is handed by reference to every subsystem.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::entities::EntityRegistry;
use crate::consts::*;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Bird hit a pipe segment
    Crashed,
    /// Bird dropped below the floor
    Fell,
    /// Coupon target reached
    Won,
}

impl EndCause {
    pub fn verdict(&self) -> Verdict {
        match self {
            EndCause::Won => Verdict::Won,
            EndCause::Crashed | EndCause::Fell => Verdict::Lost,
        }
    }
}

/// Outcome reported to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Won,
    Lost,
}

/// Run lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for start/resume
    Idle,
    /// Active gameplay
    Running,
    /// Run over, waiting for revive or restart
    Ended(EndCause),
}

impl RunPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, RunPhase::Running)
    }
}

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
        }
    }
}

/// The player's bird. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    pub velocity: f32,
    pub size: Vec2,
}

impl Bird {
    pub fn new(arena: &Arena) -> Self {
        Self {
            pos: Vec2::new(BIRD_X, arena.height / 2.0),
            velocity: 0.0,
            size: Vec2::new(BIRD_WIDTH, BIRD_HEIGHT),
        }
    }

    /// Back to vertical center, at rest
    pub fn reset(&mut self, arena: &Arena) {
        self.pos.y = arena.height / 2.0;
        self.velocity = 0.0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A pipe pair with a passable gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Bottom of the upper segment
    pub gap_top: f32,
    /// Gap height captured at spawn time
    pub gap: f32,
    /// Set once when the bird clears the pipe
    pub passed: bool,
}

impl Pipe {
    /// Trailing (right) edge
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    /// Top of the lower segment
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Coin,
    Coupon,
}

impl PickupKind {
    pub fn size(&self) -> Vec2 {
        match self {
            PickupKind::Coin => Vec2::splat(COIN_SIZE),
            PickupKind::Coupon => Vec2::new(COUPON_WIDTH, COUPON_HEIGHT),
        }
    }
}

/// A coin or coupon. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Set once on contact
    pub collected: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: kind.size(),
            collected: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Particle tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectColor {
    Gold,
    Pink,
    Red,
}

impl EffectColor {
    pub fn css(&self) -> &'static str {
        match self {
            EffectColor::Gold => "#FFD700",
            EffectColor::Pink => "#FF69B4",
            EffectColor::Red => "#DC3545",
        }
    }
}

/// A particle for visual effects (never collides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
    pub color: EffectColor,
}

impl Particle {
    /// Remaining life in 0..=1 for fading
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE_TICKS as f32
    }
}

/// Counters for the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: RunPhase,
    /// Pipes passed
    pub score: u32,
    pub coins: u32,
    pub coupons: u32,
    /// Local revive pool (also credited by coupons)
    pub revive_credits: u32,
    /// A revive was taken since the last start/resume
    pub revive_used: bool,
    /// The coupon target was reached this session
    #[serde(default)]
    pub won: bool,
}

impl SessionState {
    pub fn new(revive_credits: u32) -> Self {
        Self {
            phase: RunPhase::Idle,
            score: 0,
            coins: 0,
            coupons: 0,
            revive_credits,
            revive_used: false,
            won: false,
        }
    }
}

/// Complete simulation state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub arena: Arena,
    pub bird: Bird,
    pub session: SessionState,
    pub entities: EntityRegistry,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(seed: u64, arena: Arena, revive_credits: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            bird: Bird::new(&arena),
            session: SessionState::new(revive_credits),
            entities: EntityRegistry::default(),
            time_ticks: 0,
        }
    }

    /// Canvas resized; the bird follows the vertical center
    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena = Arena { width, height };
        self.bird.pos.y = height / 2.0;
    }
}
