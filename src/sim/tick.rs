//! Simulation tick
//!
//! One call advances the world by one frame. Within a running tick the order
//! is fixed: steer, scroll, generate, collide, check course, age debris,
//! collect garbage. The renderer reads the context afterwards.

use glam::Vec3;

use super::collision::resolve_collisions;
use super::debris::update_debris;
use super::gc::collect;
use super::generator::extend_horizon;
use super::run::{advance_level, check_course_complete, restart, start, update_intro};
use super::state::{
    CAMERA_CHASE, CAMERA_ORBIT_HEIGHT, CAMERA_ORBIT_RADIUS, GamePhase, ObjectKind, WorldContext,
};
use crate::cell_x;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering intent: -1 left, 0 straight, 1 right
    pub steering: i8,
    /// Start the level (from Ready)
    pub start: bool,
    /// Go on to the next level (from a completed level)
    pub next_level: bool,
    /// Start over at level 1 (from any level end)
    pub restart: bool,
    /// Idle/demo mode - autopilot steers the boat
    pub idle_mode: bool,
}

/// Advance the world by one tick
pub fn tick(ctx: &mut WorldContext, input: &TickInput) {
    if ctx.phase == GamePhase::NotReady {
        return;
    }
    ctx.time_ticks += 1;

    if input.start {
        start(ctx);
    }
    if input.next_level {
        advance_level(ctx);
    }
    if input.restart {
        restart(ctx);
    }

    let running = ctx.phase == GamePhase::Running;
    match ctx.phase {
        GamePhase::NotReady => {}
        GamePhase::Ready => {
            ctx.camera.orbit_angle += ctx.tuning.camera_orbit_step;
            let a = ctx.camera.orbit_angle;
            ctx.camera.position = Vec3::new(
                CAMERA_ORBIT_RADIUS * a.cos(),
                CAMERA_ORBIT_HEIGHT,
                CAMERA_ORBIT_RADIUS * a.sin(),
            );
        }
        GamePhase::Intro { ticks_left } => {
            let total = ctx.tuning.intro_ticks.max(1) as f32;
            let t = (1.0 - (ticks_left.saturating_sub(1)) as f32 / total).clamp(0.0, 1.0);
            let eased = t * t * (3.0 - 2.0 * t);
            ctx.camera.position = ctx.camera.intro_from.lerp(CAMERA_CHASE, eased);
            update_intro(ctx);
        }
        GamePhase::Running => {
            let steering = if input.idle_mode {
                autopilot_steering(ctx)
            } else {
                input.steering.signum()
            };
            let (min_x, max_x) = (ctx.tuning.player_min_x, ctx.tuning.player_max_x);
            ctx.player.steer(steering as f32 * ctx.tuning.steer_step, min_x, max_x);

            ctx.run.speed += ctx.tuning.acceleration;
            let speed = ctx.run.speed;
            ctx.run.course_progress += speed;
            scroll_world(ctx, speed);

            extend_horizon(ctx);
            resolve_collisions(ctx);
            check_course_complete(ctx);
        }
        GamePhase::LevelOver(_) => {
            ctx.run.speed = (ctx.run.speed - ctx.tuning.deceleration).max(0.0);
        }
    }

    update_debris(ctx);

    if running {
        collect(ctx);
    }
}

/// Move every row, column and the starter bay `dz` toward the camera
pub fn scroll_world(ctx: &mut WorldContext, dz: f32) {
    for row in ctx.rows.iter_mut() {
        row.z += dz;
        for obj in row.objects_mut() {
            if obj.kind.spins() {
                obj.spin += COLLECTIBLE_SPIN;
            }
        }
    }
    for column in ctx.columns.iter_mut() {
        column.position.z += dz;
    }
    if let Some(bay) = ctx.starter_bay.as_mut() {
        bay.z += dz;
        if bay.z > STARTER_BAY_REMOVE_Z {
            ctx.starter_bay = None;
            log::debug!("Starter bay left the scene");
        }
    }
}

/// Lane preference for the autopilot
fn lane_score(kind: Option<ObjectKind>) -> i32 {
    match kind {
        Some(ObjectKind::Rock) => -10,
        Some(ObjectKind::Coin) => 2,
        Some(ObjectKind::Life) => 3,
        None => 0,
    }
}

/// Steer toward the best lane of the nearest row still ahead of the boat
fn autopilot_steering(ctx: &WorldContext) -> i8 {
    let boat = &ctx.player;
    let back_edge = boat.position.z + boat.half_extents.z;
    let Some(row) = ctx
        .rows
        .iter()
        .filter(|r| r.z < back_edge && !r.is_empty())
        .max_by(|a, b| a.z.total_cmp(&b.z))
    else {
        return 0;
    };

    let x = boat.position.x;
    let best = (0..ROW_CELLS)
        .map(|cell| {
            let kind = row.cells[cell].as_ref().map(|o| o.kind);
            (cell, lane_score(kind))
        })
        .max_by(|(ca, sa), (cb, sb)| {
            // Prefer the higher score, then the closer lane
            sa.cmp(sb).then_with(|| {
                (cell_x(*cb) - x)
                    .abs()
                    .total_cmp(&(cell_x(*ca) - x).abs())
            })
        })
        .map(|(cell, _)| cell_x(cell))
        .unwrap_or(x);

    let target = best.clamp(ctx.tuning.player_min_x, ctx.tuning.player_max_x);
    let diff = target - x;
    if diff.abs() < ctx.tuning.steer_step * 0.5 {
        0
    } else if diff > 0.0 {
        1
    } else {
        -1
    }
}
