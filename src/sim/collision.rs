//! Collision resolution between the boat and row contents
//!
//! The boat's box is computed once per tick and tested against every object
//! still in play. Hits are collected first and applied after the pass, so
//! rows are never mutated while they are being walked.

use glam::Vec3;

use super::debris::spawn_debris;
use super::events::GameEvent;
use super::run::end_level;
use super::state::{Effect, LevelOutcome, ObjectKind, WorldContext};

/// One resolved hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub kind: ObjectKind,
    pub effect: Effect,
    /// Center of the struck object's box
    pub origin: Vec3,
    pub row_index: u32,
}

/// Location of an object marked for removal: (row position in sequence, cell)
type Mark = (usize, usize);

/// Find every object overlapping the boat, in row then cell order
fn find_hits(ctx: &WorldContext) -> Vec<(Mark, ObjectKind, Vec3)> {
    let player = ctx.player.bounds();
    let mut hits = Vec::new();
    for (row_pos, row) in ctx.rows.iter().enumerate() {
        for obj in row.objects() {
            let bounds = obj.bounds(row.z);
            if bounds.intersects(&player) {
                hits.push(((row_pos, obj.cell as usize), obj.kind, bounds.center()));
            }
        }
    }
    hits
}

/// Test the boat against all row contents and apply each hit's effect.
///
/// Returns the hits in the order they were applied. Does nothing once the
/// level is over. Every overlap found in the pass is applied, even after a
/// rock sinks the boat; the level ends once the pass is complete.
pub fn resolve_collisions(ctx: &mut WorldContext) -> Vec<Hit> {
    if ctx.run.level_over {
        return Vec::new();
    }

    let mut applied = Vec::new();
    let mut sunk = false;
    for ((row_pos, cell), kind, origin) in find_hits(ctx) {
        let Some(row) = ctx.rows.get_mut(row_pos) else {
            continue;
        };
        let row_index = row.row_index;
        if row.take(cell).is_none() {
            continue;
        }

        let effect = kind.effect();
        ctx.events.push(GameEvent::ObjectHit { kind, origin });
        apply_effect(ctx, effect);
        spawn_debris(ctx, origin);
        applied.push(Hit {
            kind,
            effect,
            origin,
            row_index,
        });

        if !sunk && ctx.run.lives_collected <= ctx.tuning.failure_lives {
            log::info!(
                "Boat sank on level {} (lives {})",
                ctx.run.level,
                ctx.run.lives_collected
            );
            sunk = true;
        }
    }

    if sunk {
        end_level(ctx, LevelOutcome::Failed);
    }
    applied
}

/// Mutate run counters for one effect and report the new total
pub fn apply_effect(ctx: &mut WorldContext, effect: Effect) {
    match effect {
        Effect::CoinDelta(delta) => {
            ctx.run.coins_collected = ctx.run.coins_collected.saturating_add_signed(delta);
            ctx.events.push(GameEvent::CoinCollected(ctx.run.coins_collected));
        }
        Effect::LifeDelta(delta) => {
            ctx.run.lives_collected += delta;
            ctx.events.push(GameEvent::LifeChanged(ctx.run.lives_collected));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLibrary;
    use crate::cell_x;
    use crate::sim::state::{ChallengeRow, GamePhase, WorldObject};
    use crate::tuning::Tuning;

    fn running_context() -> WorldContext {
        let mut ctx = WorldContext::new(5, Tuning::default(), &AssetLibrary::builtin()).unwrap();
        ctx.phase = GamePhase::Running;
        ctx
    }

    /// Row at the boat's play line with `kind` in `cell`
    fn row_on_boat(ctx: &mut WorldContext, cell: usize, kind: ObjectKind) {
        let shape = ctx.prototypes().get(kind.prototype());
        let id = ctx.next_entity_id();
        let index = ctx.rows.len() as u32;
        let mut row = ChallengeRow::new(index, ctx.player.position.z);
        row.cells[cell] = Some(WorldObject {
            id,
            kind,
            cell: cell as u8,
            local: Vec3::new(cell_x(cell), kind.rest_y(), 0.0),
            half_extents: shape.world_half_extents(),
            spin: 0.0,
        });
        ctx.rows.push_front(row);
        ctx.player.position.x = cell_x(cell);
    }

    #[test]
    fn test_coin_hit_increments_and_reports_total() {
        let mut ctx = running_context();
        ctx.run.coins_collected = 4;
        row_on_boat(&mut ctx, 2, ObjectKind::Coin);

        let hits = resolve_collisions(&mut ctx);
        assert_eq!(hits.len(), 1);
        assert_eq!(ctx.run.coins_collected, 5);
        let coin_events: Vec<_> = ctx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CoinCollected(_)))
            .collect();
        assert_eq!(coin_events, vec![&GameEvent::CoinCollected(5)]);
        // Object removed, row kept
        assert_eq!(ctx.rows.len(), 1);
        assert!(ctx.rows[0].is_empty());
        assert_eq!(ctx.debris.len(), 6);
    }

    #[test]
    fn test_life_and_rock_adjust_lives() {
        let mut ctx = running_context();
        row_on_boat(&mut ctx, 1, ObjectKind::Life);
        resolve_collisions(&mut ctx);
        assert_eq!(ctx.run.lives_collected, 1);

        row_on_boat(&mut ctx, 1, ObjectKind::Rock);
        resolve_collisions(&mut ctx);
        assert_eq!(ctx.run.lives_collected, 0);
        assert!(ctx.events.contains(&GameEvent::LifeChanged(0)));
    }

    #[test]
    fn test_hit_origin_is_object_center() {
        let mut ctx = running_context();
        row_on_boat(&mut ctx, 3, ObjectKind::Rock);
        let hits = resolve_collisions(&mut ctx);
        assert!(hits[0].origin.distance(Vec3::new(cell_x(3), 3.0, 60.0)) < 1e-4);
        assert!(ctx.debris.iter().all(|b| b.origin == hits[0].origin));
    }

    #[test]
    fn test_miss_leaves_row_untouched() {
        let mut ctx = running_context();
        row_on_boat(&mut ctx, 0, ObjectKind::Rock);
        ctx.player.position.x = cell_x(4);
        assert!(resolve_collisions(&mut ctx).is_empty());
        assert_eq!(ctx.object_count(), 1);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_multiple_hits_accumulate() {
        let mut ctx = running_context();
        row_on_boat(&mut ctx, 2, ObjectKind::Coin);
        row_on_boat(&mut ctx, 2, ObjectKind::Coin);
        row_on_boat(&mut ctx, 2, ObjectKind::Life);
        let hits = resolve_collisions(&mut ctx);
        assert_eq!(hits.len(), 3);
        assert_eq!(ctx.run.coins_collected, 2);
        assert_eq!(ctx.run.lives_collected, 1);
        assert_eq!(ctx.debris.len(), 18);
    }

    #[test]
    fn test_fifth_rock_fails_run_once() {
        let mut ctx = running_context();
        ctx.run.lives_collected = -4;
        row_on_boat(&mut ctx, 2, ObjectKind::Rock);
        resolve_collisions(&mut ctx);

        assert_eq!(ctx.run.lives_collected, -5);
        assert!(ctx.run.level_over);
        assert_eq!(ctx.phase, GamePhase::LevelOver(LevelOutcome::Failed));
        // Debris is wiped on entering level over
        assert!(ctx.debris.is_empty());

        // Another rock while already over does nothing
        row_on_boat(&mut ctx, 2, ObjectKind::Rock);
        assert!(resolve_collisions(&mut ctx).is_empty());
        let failures = ctx.events.iter().filter(|e| **e == GameEvent::RunFailed).count();
        assert_eq!(failures, 1);
        assert_eq!(ctx.run.lives_collected, -5);
    }

    #[test]
    fn test_hits_after_sinking_rock_still_apply() {
        let mut ctx = running_context();
        ctx.run.lives_collected = -4;
        // Coin row pushed first so the rock row is walked before it
        row_on_boat(&mut ctx, 2, ObjectKind::Coin);
        row_on_boat(&mut ctx, 2, ObjectKind::Rock);

        let hits = resolve_collisions(&mut ctx);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, ObjectKind::Rock);
        assert_eq!(ctx.run.coins_collected, 1);
        assert_eq!(ctx.run.lives_collected, -5);
        assert_eq!(ctx.object_count(), 0);
        assert_eq!(ctx.phase, GamePhase::LevelOver(LevelOutcome::Failed));
        assert!(ctx.debris.is_empty());
        let failures = ctx.events.iter().filter(|e| **e == GameEvent::RunFailed).count();
        assert_eq!(failures, 1);
        // Level end is reported after the hits that caused it
        assert_eq!(ctx.events.last(), Some(&GameEvent::RunFailed));
    }

    #[test]
    fn test_level_over_is_noop() {
        let mut ctx = running_context();
        ctx.run.level_over = true;
        row_on_boat(&mut ctx, 2, ObjectKind::Coin);
        assert!(resolve_collisions(&mut ctx).is_empty());
        assert_eq!(ctx.object_count(), 1);
    }
}
