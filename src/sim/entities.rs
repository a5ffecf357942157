//! Live pipes, pickups and particles
//!
//! Pipes are kept in creation order, so the last element is always the
//! rightmost one and drives spacing.

use glam::Vec2;
use rand::Rng;

use super::params::SessionParameters;
use super::state::{EffectColor, Particle, Pickup, PickupKind, Pipe};
use crate::consts::*;

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    pub pipes: Vec<Pipe>,
    pub coins: Vec<Pickup>,
    pub coupons: Vec<Pickup>,
    pub particles: Vec<Particle>,
    next_id: u32,
}

impl EntityRegistry {
    fn next_entity_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Spawn a pipe at the right edge once the newest one has scrolled
    /// `horizontal_spacing` in. Returns true if a pipe was created.
    pub fn spawn_obstacle_if_due<R: Rng + ?Sized>(
        &mut self,
        right_edge: f32,
        arena_height: f32,
        params: &SessionParameters,
        rng: &mut R,
    ) -> bool {
        let due = match self.pipes.last() {
            None => true,
            Some(last) => last.x < right_edge - params.horizontal_spacing,
        };
        if due {
            self.spawn_obstacle_at(right_edge, arena_height, params, rng);
        }
        due
    }

    /// Create a pipe with its left edge at `x`, plus the pickups that ride with it
    pub fn spawn_obstacle_at<R: Rng + ?Sized>(
        &mut self,
        x: f32,
        arena_height: f32,
        params: &SessionParameters,
        rng: &mut R,
    ) {
        let gap = params.vertical_gap;
        let min_top = PIPE_MIN_SEGMENT;
        let max_top = arena_height - gap - PIPE_MIN_SEGMENT;
        // Arena too short for the gap: pin the gap under the minimum top segment
        let gap_top = if max_top > min_top {
            min_top + rng.random::<f32>() * (max_top - min_top)
        } else {
            min_top
        };

        let id = self.next_entity_id();
        self.pipes.push(Pipe {
            id,
            x,
            gap_top,
            gap,
            passed: false,
        });

        if rng.random_bool(COIN_SPAWN_CHANCE) {
            let y = gap_top + gap * 0.3 + rng.random::<f32>() * gap * 0.4;
            let id = self.next_entity_id();
            self.coins
                .push(Pickup::new(id, PickupKind::Coin, Vec2::new(x + COIN_OFFSET_X, y)));
        }

        if rng.random_bool(COUPON_SPAWN_CHANCE) {
            let span = (arena_height - 2.0 * COUPON_MARGIN_Y).max(0.0);
            let y = COUPON_MARGIN_Y + rng.random::<f32>() * span;
            let id = self.next_entity_id();
            self.coupons.push(Pickup::new(
                id,
                PickupKind::Coupon,
                Vec2::new(x + COUPON_OFFSET_X, y),
            ));
        }
    }

    /// Scroll everything left by `speed`, then retire what is gone
    pub fn advance(&mut self, speed: f32) {
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }
        for pickup in self.coins.iter_mut().chain(self.coupons.iter_mut()) {
            pickup.pos.x -= speed;
        }
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.pos.x -= speed;
            particle.life = particle.life.saturating_sub(1);
        }

        self.pipes.retain(|p| p.right() >= 0.0);
        self.coins
            .retain(|c| !c.collected && c.pos.x + c.size.x >= 0.0);
        self.coupons
            .retain(|c| !c.collected && c.pos.x + c.size.x >= 0.0);
        self.particles.retain(|p| p.life > 0);
    }

    /// Flag every pipe the bird has fully cleared. Returns how many were newly passed.
    pub fn mark_passed(&mut self, actor_x: f32) -> u32 {
        let mut newly_passed = 0;
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.right() < actor_x {
                pipe.passed = true;
                newly_passed += 1;
            }
        }
        newly_passed
    }

    /// Remove pipes whose left edge lies strictly inside the revive window
    /// around `actor_x`. Returns how many were removed.
    pub fn clear_revive_window(&mut self, actor_x: f32) -> usize {
        let before = self.pipes.len();
        self.pipes.retain(|p| {
            !(p.x < actor_x + REVIVE_CLEAR_AHEAD && p.x > actor_x - REVIVE_CLEAR_BEHIND)
        });
        before - self.pipes.len()
    }

    /// Emit a cosmetic particle burst
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        center: Vec2,
        color: EffectColor,
        count: usize,
        rng: &mut R,
    ) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
                rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
            );
            self.particles.push(Particle {
                pos: center,
                vel,
                life: PARTICLE_LIFE_TICKS,
                color,
            });
        }
    }

    /// Drop every entity (restart)
    pub fn clear(&mut self) {
        self.pipes.clear();
        self.coins.clear();
        self.coupons.clear();
        self.particles.clear();
    }
}
