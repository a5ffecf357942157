//! Fixed timestep simulation tick
//!
//! Order within a running tick: physics, scroll/spawn, pickups, pipes.
//! A terminal condition ends the tick immediately.

use super::collision::{resolve_collectibles, resolve_obstacles};
use super::params::SessionParameters;
use super::physics;
use super::state::{EffectColor, EndCause, GameState, RunPhase};
use crate::consts::CRASH_BURST;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (space/click while running)
    pub flap: bool,
    /// Demo mode - AI flaps for the player
    pub autopilot: bool,
}

/// Advance the game state by one fixed step.
/// Returns the cause if the run ended during this tick.
pub fn tick(state: &mut GameState, params: &SessionParameters, input: &TickInput) -> Option<EndCause> {
    if !state.session.phase.is_running() {
        // Particles keep fading on the game-over screen
        state.entities.advance(0.0);
        return None;
    }

    state.time_ticks += 1;

    let wants_flap = input.flap || (input.autopilot && autopilot_wants_flap(state));
    if wants_flap {
        physics::impulse(&mut state.bird, state.session.phase);
    }

    if physics::step(&mut state.bird, state.arena.height).fell {
        return Some(end_run(state, EndCause::Fell));
    }

    let speed = params.current_speed(state.session.score);
    state.entities.advance(speed);
    state.session.score += state.entities.mark_passed(state.bird.pos.x);
    state.entities.spawn_obstacle_if_due(
        state.arena.width,
        state.arena.height,
        params,
        &mut state.rng,
    );

    let report = resolve_collectibles(
        &state.bird,
        &mut state.entities.coins,
        &mut state.entities.coupons,
        &mut state.session,
        params.coupons_to_win,
    );
    for effect in &report.effects {
        state
            .entities
            .burst(effect.center, effect.color, effect.count, &mut state.rng);
    }
    if report.won {
        return Some(end_run(state, EndCause::Won));
    }

    if resolve_obstacles(&state.bird, &state.entities.pipes).is_some() {
        return Some(end_run(state, EndCause::Crashed));
    }

    None
}

fn end_run(state: &mut GameState, cause: EndCause) -> EndCause {
    state.session.phase = RunPhase::Ended(cause);
    if cause != EndCause::Won {
        let center = state.bird.center();
        state
            .entities
            .burst(center, EffectColor::Red, CRASH_BURST, &mut state.rng);
    }
    cause
}

/// Simple demo AI: aim for the lower part of the next gap and flap when
/// sinking below it
fn autopilot_wants_flap(state: &GameState) -> bool {
    let bird = &state.bird;
    let target = state
        .entities
        .pipes
        .iter()
        .find(|p| p.right() >= bird.pos.x)
        .map(|p| p.gap_top + p.gap * 0.65)
        .unwrap_or(state.arena.height / 2.0);

    bird.velocity >= 0.0 && bird.pos.y + bird.size.y > target
}
