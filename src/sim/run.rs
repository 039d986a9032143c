//! Level/run state machine
//!
//! `NotReady -> Ready -> Intro -> Running -> LevelOver -> (next level | restart)`.
//! Transitions fire from explicit requests or tick-counted conditions,
//! never from animation callbacks.

use glam::Vec3;

use super::debris::clear_debris;
use super::events::GameEvent;
use super::generator::seed_level;
use super::state::{CameraRig, GamePhase, LevelOutcome, RunState, WorldContext};
use crate::consts::*;

/// Reset the world for `level` and lay out its opening stretch.
/// Leaves the context in `Ready`. Speed carries over from the caller.
pub fn setup_level(ctx: &mut WorldContext, level: u32) {
    let speed = ctx.run.speed;
    ctx.run = RunState {
        speed,
        level,
        ..RunState::new(ctx.tuning.course_length(level))
    };

    ctx.rows.clear();
    ctx.columns.clear();
    clear_debris(ctx);

    ctx.player.position = Vec3::new(0.0, PLAYER_Y, ctx.tuning.play_line_z);
    ctx.player.flying_away = false;
    ctx.starter_bay = Some(Vec3::new(STARTER_BAY_X, 0.0, STARTER_BAY_Z));
    ctx.camera = CameraRig::default();

    seed_level(ctx);

    ctx.phase = GamePhase::Ready;
    ctx.events.push(GameEvent::LevelReady { level });
    log::info!(
        "Level {} ready: course length {}, start speed {:.2}",
        level,
        ctx.run.course_length,
        ctx.run.speed
    );
}

/// Player pressed start: begin the camera fly-in
pub fn start(ctx: &mut WorldContext) -> bool {
    if ctx.phase != GamePhase::Ready {
        log::warn!("Start requested in {:?}, ignoring", ctx.phase);
        return false;
    }
    ctx.camera.intro_from = ctx.camera.position;
    ctx.phase = GamePhase::Intro {
        ticks_left: ctx.tuning.intro_ticks,
    };
    log::info!("Level {} starting", ctx.run.level);
    true
}

/// Count down the fly-in; the run begins when it reaches zero
pub fn update_intro(ctx: &mut WorldContext) {
    if let GamePhase::Intro { ticks_left } = ctx.phase {
        if ticks_left <= 1 {
            ctx.phase = GamePhase::Running;
            log::info!("Level {} running", ctx.run.level);
        } else {
            ctx.phase = GamePhase::Intro {
                ticks_left: ticks_left - 1,
            };
        }
    }
}

/// Enter `LevelOver`. Debris is destroyed and deceleration starts on the
/// next tick. Repeated calls are ignored so each outcome is reported once.
pub fn end_level(ctx: &mut WorldContext, outcome: LevelOutcome) {
    if ctx.run.level_over {
        return;
    }
    ctx.run.level_over = true;
    ctx.player.flying_away = true;
    ctx.phase = GamePhase::LevelOver(outcome);
    clear_debris(ctx);

    ctx.events.push(match outcome {
        LevelOutcome::Succeeded => GameEvent::RunSucceeded,
        LevelOutcome::Failed => GameEvent::RunFailed,
    });
    log::info!(
        "Level {} over ({:?}): coins {}, lives {}",
        ctx.run.level,
        outcome,
        ctx.run.coins_collected,
        ctx.run.lives_collected
    );
}

/// Finish the level once the course has been covered
pub fn check_course_complete(ctx: &mut WorldContext) {
    if ctx.phase == GamePhase::Running
        && ctx.run.course_progress >= ctx.run.course_length
        && !ctx.player.flying_away
    {
        end_level(ctx, LevelOutcome::Succeeded);
    }
}

/// Go on to the next level after a completed course
pub fn advance_level(ctx: &mut WorldContext) -> bool {
    if ctx.phase != GamePhase::LevelOver(LevelOutcome::Succeeded) {
        log::warn!("Next level requested in {:?}, ignoring", ctx.phase);
        return false;
    }
    let level = ctx.run.level;
    ctx.run.speed = level as f32 * ctx.tuning.level_start_speed_step;
    setup_level(ctx, level + 1);
    true
}

/// Start over from level 1 after any level end
pub fn restart(ctx: &mut WorldContext) -> bool {
    if !matches!(ctx.phase, GamePhase::LevelOver(_)) {
        log::warn!("Restart requested in {:?}, ignoring", ctx.phase);
        return false;
    }
    let level = ctx.run.level;
    ctx.run.speed = level as f32 * ctx.tuning.level_start_speed_step;
    setup_level(ctx, 1);
    true
}
