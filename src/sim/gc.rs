//! Garbage collection of geometry that has scrolled behind the camera
//!
//! Reclaim is throttled: each call removes every eligible row (and column)
//! except the last one found in sequence order, so a burst of eligible
//! entries drains over a few ticks instead of all at once.

use std::collections::VecDeque;

use super::events::GameEvent;
use super::state::WorldContext;

/// Positions (in sequence order) of entries to drop: all eligible but the last
fn throttled_marks<T>(items: &VecDeque<T>, eligible: impl Fn(&T) -> bool) -> Vec<usize> {
    let mut marks: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| eligible(item))
        .map(|(pos, _)| pos)
        .collect();
    marks.pop();
    marks
}

/// Drop marked positions without disturbing the order of survivors
fn compact<T>(items: &mut VecDeque<T>, marks: &[usize]) -> Vec<T> {
    let mut removed = Vec::with_capacity(marks.len());
    // Highest position first keeps the remaining marks valid
    for &pos in marks.iter().rev() {
        if let Some(item) = items.remove(pos) {
            removed.push(item);
        }
    }
    removed.reverse();
    removed
}

/// Reclaim rows, columns and debris past the collection threshold
pub fn collect(ctx: &mut WorldContext) {
    let threshold = ctx.tuning.gc_threshold_z;

    let column_marks = throttled_marks(&ctx.columns, |c| c.position.z > threshold);
    for column in compact(&mut ctx.columns, &column_marks) {
        log::debug!("Removing column {} from scene", column.index);
    }

    let row_marks = throttled_marks(&ctx.rows, |r| r.z > threshold);
    for row in compact(&mut ctx.rows, &row_marks) {
        log::debug!("Removing challenge row {} from scene", row.row_index);
        ctx.events.push(GameEvent::RowDestroyed {
            row_index: row.row_index,
        });
    }

    ctx.debris.retain(|bit| bit.position.z <= threshold);
}
