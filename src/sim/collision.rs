//! Collision detection between the bird and pipes or pickups
//!
//! Everything is axis-aligned boxes. Pipes and pickups are tested in
//! creation order so the first hit in a tick is deterministic.

use glam::Vec2;

use super::state::{Bird, EffectColor, Pickup, Pipe, SessionState};
use crate::consts::{COIN_BURST, COUPON_BURST, PIPE_WIDTH};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Strict overlap on the x axis only
    pub fn overlaps_x(&self, min_x: f32, max_x: f32) -> bool {
        self.min.x < max_x && self.max.x > min_x
    }
}

/// Request for a cosmetic particle burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub center: Vec2,
    pub color: EffectColor,
    pub count: usize,
}

/// Result of resolving pickups for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectReport {
    pub coins: u32,
    pub coupons: u32,
    /// The coupon target was crossed this tick
    pub won: bool,
    pub effects: Vec<EffectRequest>,
}

/// Returns the id of the first pipe the bird crashed into, if any
pub fn resolve_obstacles(bird: &Bird, pipes: &[Pipe]) -> Option<u32> {
    let bounds = bird.bounds();
    pipes
        .iter()
        .find(|pipe| {
            bounds.overlaps_x(pipe.x, pipe.x + PIPE_WIDTH)
                && (bounds.min.y < pipe.gap_top || bounds.max.y > pipe.gap_bottom())
        })
        .map(|pipe| pipe.id)
}

/// Collect every touched coin, then coupons. Reaching `coupons_to_win`
/// stops processing immediately; the win fires once per session.
pub fn resolve_collectibles(
    bird: &Bird,
    coins: &mut [Pickup],
    coupons: &mut [Pickup],
    session: &mut SessionState,
    coupons_to_win: u32,
) -> CollectReport {
    let bounds = bird.bounds();
    let mut report = CollectReport::default();

    for coin in coins.iter_mut() {
        if coin.collected || !bounds.overlaps(&coin.bounds()) {
            continue;
        }
        coin.collected = true;
        session.coins += 1;
        report.coins += 1;
        report.effects.push(EffectRequest {
            center: coin.center(),
            color: EffectColor::Gold,
            count: COIN_BURST,
        });
    }

    for coupon in coupons.iter_mut() {
        if coupon.collected || !bounds.overlaps(&coupon.bounds()) {
            continue;
        }
        coupon.collected = true;
        session.coupons += 1;
        session.revive_credits += 1;
        report.coupons += 1;
        report.effects.push(EffectRequest {
            center: coupon.center(),
            color: EffectColor::Pink,
            count: COUPON_BURST,
        });

        if !session.won && session.coupons >= coupons_to_win {
            session.won = true;
            report.won = true;
            break;
        }
    }

    report
}
