//! Procedural world generation
//!
//! Rows and columns are appended at the horizon as the world scrolls, and a
//! batch of them is laid out up front when a level is set up.

use glam::Vec3;
use rand::Rng;

use super::state::{BackgroundColumn, ChallengeRow, ObjectKind, WorldContext, WorldObject};
use crate::cell_x;
use crate::consts::*;

/// Roll thresholds on a uniform draw in [0, 10).
/// Rolls in [4, 9] leave the cell empty.
pub const ROCK_BELOW: f32 = 2.0;
pub const COIN_BELOW: f32 = 4.0;
pub const LIFE_ABOVE: f32 = 9.0;

/// Map a cell roll to what spawns there
pub fn kind_for_roll(roll: f32) -> Option<ObjectKind> {
    if roll < ROCK_BELOW {
        Some(ObjectKind::Rock)
    } else if roll < COIN_BELOW {
        Some(ObjectKind::Coin)
    } else if roll > LIFE_ABOVE {
        Some(ObjectKind::Life)
    } else {
        None
    }
}

/// Draw the contents of one cell
pub fn roll_cell<R: Rng + ?Sized>(rng: &mut R) -> Option<ObjectKind> {
    kind_for_roll(rng.random_range(0.0..10.0))
}

/// Z offset for the `count`-th spawn
fn spawn_z(ctx: &WorldContext, count: u32, at_horizon: bool) -> f32 {
    if at_horizon {
        ctx.tuning.horizon_z
    } else {
        -(count as f32 * ctx.tuning.row_spacing)
    }
}

/// Spawn a background column, alternating sides by parity of `count`
pub fn spawn_column(ctx: &mut WorldContext, count: u32, at_horizon: bool) {
    let z = spawn_z(ctx, count, at_horizon);
    let jitter: f32 = ctx.rng.random();
    let x = if count % 2 == 0 {
        COLUMN_X - jitter
    } else {
        -COLUMN_X - jitter
    };
    let rotation: f32 = ctx.rng.random();
    let id = ctx.next_entity_id();

    ctx.columns.push_front(BackgroundColumn {
        id,
        index: count,
        position: Vec3::new(x, COLUMN_Y, z),
        rotation,
    });
}

/// Spawn a challenge row with up to `ROW_CELLS` objects
pub fn spawn_row(ctx: &mut WorldContext, count: u32, at_horizon: bool) {
    let z = spawn_z(ctx, count, at_horizon);
    let mut row = ChallengeRow::new(count, z);

    for cell in 0..ROW_CELLS {
        let Some(kind) = roll_cell(&mut ctx.rng) else {
            continue;
        };
        let shape = ctx.prototypes.get(kind.prototype());
        row.cells[cell] = Some(WorldObject {
            id: ctx.next_entity_id(),
            kind,
            cell: cell as u8,
            local: Vec3::new(cell_x(cell), kind.rest_y(), 0.0),
            half_extents: shape.world_half_extents(),
            spin: 0.0,
        });
    }

    log::trace!("Row {} spawned at z={} with {} objects", count, z, row.len());
    ctx.rows.push_front(row);
}

/// Whether a sequence whose front element sits at `front_z` needs a new entry
fn needs_spawn(front_z: Option<f32>, threshold: f32) -> bool {
    front_z.is_none_or(|z| z > threshold)
}

/// Append new content at the horizon once the frontmost entries have
/// scrolled past the spawn threshold. Nothing is added once the level is over.
pub fn extend_horizon(ctx: &mut WorldContext) {
    if ctx.run.level_over {
        return;
    }
    let threshold = ctx.tuning.spawn_threshold_z;

    if needs_spawn(ctx.columns.front().map(|c| c.position.z), threshold) {
        let count = ctx.run.column_count;
        ctx.run.column_count += 1;
        spawn_column(ctx, count, true);
    }

    if needs_spawn(ctx.rows.front().map(|r| r.z), threshold) {
        let count = ctx.run.row_count;
        ctx.run.row_count += 1;
        spawn_row(ctx, count, true);
    }
}

/// Lay out the opening stretch of a level
pub fn seed_level(ctx: &mut WorldContext) {
    for _ in 0..ctx.tuning.initial_rows {
        let row = ctx.run.row_count;
        ctx.run.row_count += 1;
        spawn_row(ctx, row, false);

        let column = ctx.run.column_count;
        ctx.run.column_count += 1;
        spawn_column(ctx, column, false);
    }
    log::debug!(
        "Seeded {} rows / {} columns ({} objects)",
        ctx.rows.len(),
        ctx.columns.len(),
        ctx.object_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLibrary;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn context() -> WorldContext {
        WorldContext::new(42, Tuning::default(), &AssetLibrary::builtin()).unwrap()
    }

    #[test]
    fn test_kind_for_roll_thresholds() {
        assert_eq!(kind_for_roll(0.0), Some(ObjectKind::Rock));
        assert_eq!(kind_for_roll(1.99), Some(ObjectKind::Rock));
        assert_eq!(kind_for_roll(2.0), Some(ObjectKind::Coin));
        assert_eq!(kind_for_roll(3.99), Some(ObjectKind::Coin));
        assert_eq!(kind_for_roll(4.0), None);
        assert_eq!(kind_for_roll(6.5), None);
        assert_eq!(kind_for_roll(9.0), None);
        assert_eq!(kind_for_roll(9.01), Some(ObjectKind::Life));
    }

    #[test]
    fn test_cell_distribution() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            let slot = match roll_cell(&mut rng) {
                Some(ObjectKind::Rock) => 0,
                Some(ObjectKind::Coin) => 1,
                Some(ObjectKind::Life) => 2,
                None => 3,
            };
            counts[slot] += 1;
        }
        let frac = |n: u32| n as f32 / 10_000.0;
        assert!((frac(counts[0]) - 0.2).abs() < 0.02, "rock {:?}", counts);
        assert!((frac(counts[1]) - 0.2).abs() < 0.02, "coin {:?}", counts);
        assert!((frac(counts[2]) - 0.1).abs() < 0.02, "life {:?}", counts);
        assert!((frac(counts[3]) - 0.5).abs() < 0.02, "empty {:?}", counts);
    }

    #[test]
    fn test_spawn_offsets() {
        let mut ctx = context();
        spawn_row(&mut ctx, 3, false);
        spawn_row(&mut ctx, 4, true);
        assert_eq!(ctx.rows[0].z, -1400.0);
        assert_eq!(ctx.rows[1].z, -180.0);

        spawn_column(&mut ctx, 2, false);
        spawn_column(&mut ctx, 3, true);
        assert_eq!(ctx.columns[1].position.z, -120.0);
        assert_eq!(ctx.columns[0].position.z, -1400.0);
    }

    #[test]
    fn test_columns_alternate_sides() {
        let mut ctx = context();
        for count in 0..6 {
            spawn_column(&mut ctx, count, false);
        }
        for col in &ctx.columns {
            if col.index % 2 == 0 {
                assert!(col.position.x > 58.9 && col.position.x <= 60.0);
            } else {
                assert!(col.position.x > -61.0 && col.position.x <= -60.0);
            }
            assert!((0.0..1.0).contains(&col.rotation));
        }
    }

    #[test]
    fn test_row_objects_sit_in_their_lanes() {
        let mut ctx = context();
        for count in 0..50 {
            spawn_row(&mut ctx, count, false);
        }
        assert!(ctx.object_count() > 0);
        for row in &ctx.rows {
            for obj in row.objects() {
                assert_eq!(obj.local.x, cell_x(obj.cell as usize));
                assert_eq!(obj.local.y, obj.kind.rest_y());
            }
        }
    }

    #[test]
    fn test_extend_horizon_triggers() {
        let mut ctx = context();
        // Empty sequences always get a new entry
        extend_horizon(&mut ctx);
        assert_eq!(ctx.rows.len(), 1);
        assert_eq!(ctx.columns.len(), 1);

        // Front still beyond the threshold: nothing new
        extend_horizon(&mut ctx);
        assert_eq!(ctx.rows.len(), 1);

        // Front scrolled past the threshold
        ctx.rows[0].z = -1299.0;
        ctx.columns[0].position.z = -1299.0;
        extend_horizon(&mut ctx);
        assert_eq!(ctx.rows.len(), 2);
        assert_eq!(ctx.columns.len(), 2);
        assert_eq!(ctx.rows[0].row_index, 1);
        assert_eq!(ctx.run.row_count, 2);
    }

    #[test]
    fn test_extend_horizon_stops_when_level_over() {
        let mut ctx = context();
        ctx.run.level_over = true;
        extend_horizon(&mut ctx);
        assert!(ctx.rows.is_empty());
        assert!(ctx.columns.is_empty());
    }

    #[test]
    fn test_seed_level_is_deterministic() {
        let mut a = context();
        let mut b = context();
        seed_level(&mut a);
        seed_level(&mut b);
        assert_eq!(a.rows.len(), 60);
        assert_eq!(a.columns.len(), 60);
        let kinds = |ctx: &WorldContext| {
            ctx.rows
                .iter()
                .flat_map(|r| r.objects().map(|o| (r.row_index, o.cell, o.kind)))
                .collect::<Vec<_>>()
        };
        assert_eq!(kinds(&a), kinds(&b));
        // Newest row is the furthest ahead
        assert_eq!(a.rows.front().map(|r| r.row_index), Some(59));
        assert_eq!(a.rows.front().map(|r| r.z), Some(-3540.0));
    }
}
