//! Bird physics: gravity, flap impulse, ceiling and floor

use super::state::{Bird, RunPhase};
use crate::consts::{GRAVITY, JUMP_POWER};

/// What happened during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsStep {
    /// Bird was pushed back down to y = 0
    pub hit_ceiling: bool,
    /// Bird's bottom edge went below the floor
    pub fell: bool,
}

/// Integrate one tick. The ceiling clamp is applied after the position update.
pub fn step(bird: &mut Bird, floor: f32) -> PhysicsStep {
    bird.velocity += GRAVITY;
    bird.pos.y += bird.velocity;

    let mut result = PhysicsStep::default();
    if bird.pos.y < 0.0 {
        bird.pos.y = 0.0;
        bird.velocity = 0.0;
        result.hit_ceiling = true;
    }
    if bird.pos.y + bird.size.y > floor {
        result.fell = true;
    }
    result
}

/// Flap. Ignored unless the run is live; returns whether it applied.
pub fn impulse(bird: &mut Bird, phase: RunPhase) -> bool {
    if !phase.is_running() {
        return false;
    }
    bird.velocity = JUMP_POWER;
    true
}
