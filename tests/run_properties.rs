//! Property tests over whole runs driven through the public tick API

use proptest::prelude::*;

use sea_runner::sim::{
    GameEvent, GamePhase, ObjectKind, TickInput, WorldContext, collect, setup_level, tick,
};
use sea_runner::{AssetLibrary, Tuning};

/// Short, fast course so a few hundred ticks reach the level end
fn quick_tuning() -> Tuning {
    Tuning {
        acceleration: 0.05,
        course_length_per_level: 300.0,
        intro_ticks: 1,
        ..Tuning::default()
    }
}

fn running_context(seed: u64) -> WorldContext {
    let mut ctx = WorldContext::new(seed, quick_tuning(), &AssetLibrary::builtin()).unwrap();
    setup_level(&mut ctx, 1);
    let go = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut ctx, &go);
    while ctx.phase != GamePhase::Running {
        tick(&mut ctx, &TickInput::default());
    }
    ctx
}

fn steer(steering: i8) -> TickInput {
    TickInput {
        steering,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn progress_never_decreases_and_freezes_after_level_end(
        seed in any::<u64>(),
        steering in prop::collection::vec(-1i8..=1, 50..400),
    ) {
        let mut ctx = running_context(seed);
        let mut last = ctx.run.course_progress;
        let mut frozen_at: Option<f32> = None;

        for s in steering {
            tick(&mut ctx, &steer(s));
            prop_assert!(ctx.run.course_progress >= last);
            last = ctx.run.course_progress;

            if let GamePhase::LevelOver(_) = ctx.phase {
                let frozen = *frozen_at.get_or_insert(ctx.run.course_progress);
                prop_assert_eq!(ctx.run.course_progress, frozen);
                prop_assert!(ctx.debris.is_empty());
            }
        }
    }

    #[test]
    fn boat_stays_in_corridor(
        seed in any::<u64>(),
        steering in prop::collection::vec(any::<i8>(), 1..300),
    ) {
        let mut ctx = running_context(seed);
        let (min_x, max_x) = (ctx.tuning.player_min_x, ctx.tuning.player_max_x);
        for s in steering {
            tick(&mut ctx, &steer(s));
            prop_assert!(ctx.player.position.x >= min_x && ctx.player.position.x <= max_x);
        }
    }

    #[test]
    fn counters_match_hit_events(
        seed in any::<u64>(),
        steering in prop::collection::vec(-1i8..=1, 100..400),
    ) {
        let mut ctx = running_context(seed);
        ctx.events.clear();
        for s in steering {
            tick(&mut ctx, &steer(s));
        }

        let hits = |kind: ObjectKind| {
            ctx.events
                .iter()
                .filter(|e| matches!(e, GameEvent::ObjectHit { kind: k, .. } if *k == kind))
                .count() as i32
        };
        prop_assert_eq!(ctx.run.coins_collected as i32, hits(ObjectKind::Coin));
        prop_assert_eq!(
            ctx.run.lives_collected,
            hits(ObjectKind::Life) - hits(ObjectKind::Rock)
        );
        prop_assert!(ctx.run.lives_collected >= ctx.tuning.failure_lives);

        let ends = ctx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunFailed | GameEvent::RunSucceeded))
            .count();
        prop_assert!(ends <= 1);
    }

    #[test]
    fn collection_leaves_at_most_one_eligible_and_settles(
        seed in any::<u64>(),
        ticks in 50usize..300,
        shifts in prop::collection::vec(0.0f32..400.0, 0..20),
    ) {
        let mut ctx = running_context(seed);
        for _ in 0..ticks {
            tick(&mut ctx, &TickInput::default());
        }
        // Push an arbitrary number of rows past the threshold at once
        for (row, dz) in ctx.rows.iter_mut().rev().zip(&shifts) {
            row.z += dz;
        }

        let threshold = ctx.tuning.gc_threshold_z;
        collect(&mut ctx);
        let eligible_rows = ctx.rows.iter().filter(|r| r.z > threshold).count();
        let eligible_columns = ctx.columns.iter().filter(|c| c.position.z > threshold).count();
        prop_assert!(eligible_rows <= 1);
        prop_assert!(eligible_columns <= 1);

        let (rows, columns) = (ctx.rows.len(), ctx.columns.len());
        collect(&mut ctx);
        prop_assert_eq!(ctx.rows.len(), rows);
        prop_assert_eq!(ctx.columns.len(), columns);
    }

    #[test]
    fn same_seed_and_input_replay_identically(
        seed in any::<u64>(),
        steering in prop::collection::vec(-1i8..=1, 1..250),
    ) {
        let mut a = running_context(seed);
        let mut b = running_context(seed);
        for s in steering {
            tick(&mut a, &steer(s));
            tick(&mut b, &steer(s));
        }
        prop_assert_eq!(a.phase, b.phase);
        prop_assert_eq!(a.run.coins_collected, b.run.coins_collected);
        prop_assert_eq!(a.run.lives_collected, b.run.lives_collected);
        prop_assert_eq!(a.player.position, b.player.position);
        prop_assert_eq!(a.drain_events(), b.drain_events());
    }
}
