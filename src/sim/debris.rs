//! Destruction effect pool
//!
//! Every hit throws out a small burst of fragments. Fragments are visual
//! only: each plays a single outward move, holds its final position, and
//! is destroyed once it has lived past the lifetime cap.

use glam::Vec3;

use super::state::{DebrisFragment, WorldContext};
use crate::planar_offset;

/// Angle between consecutive fragments (radians). Produces a narrow fan.
pub const DEBRIS_ANGLE_STEP: f32 = 1.0 / 45.0;

/// Throw `debris_per_hit` fragments around `origin`
pub fn spawn_debris(ctx: &mut WorldContext, origin: Vec3) {
    let from = ctx.player.position;
    let radius = ctx.tuning.debris_radius;

    for i in 0..ctx.tuning.debris_per_hit {
        let offset = planar_offset(radius, i as f32 * DEBRIS_ANGLE_STEP);
        let id = ctx.next_entity_id();
        ctx.debris.push(DebrisFragment {
            id,
            from,
            origin,
            offset,
            position: from,
            lifetime: 0,
        });
    }
}

/// Age and animate every fragment by one tick, dropping expired ones
pub fn update_debris(ctx: &mut WorldContext) {
    let max_lifetime = ctx.tuning.debris_max_lifetime;
    let anim_ticks = ctx.tuning.debris_anim_ticks.max(1) as f32;

    for bit in ctx.debris.iter_mut() {
        bit.lifetime += 1;
        let t = (bit.lifetime as f32 / anim_ticks).min(1.0);
        bit.position = bit.from.lerp(bit.target(), t);
    }

    let before = ctx.debris.len();
    ctx.debris.retain(|bit| bit.lifetime <= max_lifetime);
    let expired = before - ctx.debris.len();
    if expired > 0 {
        log::trace!("{} debris fragments expired", expired);
    }
}

/// Destroy every fragment at once (level end)
pub fn clear_debris(ctx: &mut WorldContext) {
    ctx.debris.clear();
}
