//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, timers counted in ticks
//! - Seeded RNG only
//! - Stable iteration order (rows and columns newest first)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod debris;
pub mod events;
pub mod gc;
pub mod generator;
pub mod run;
pub mod state;
pub mod tick;

pub use bounds::Aabb;
pub use collision::{Hit, resolve_collisions};
pub use debris::spawn_debris;
pub use events::{EventLog, EventSink, GameEvent, dispatch};
pub use gc::collect;
pub use generator::{extend_horizon, spawn_column, spawn_row};
pub use run::{advance_level, end_level, restart, setup_level, start};
pub use state::{
    BackgroundColumn, ChallengeRow, DebrisFragment, Effect, GamePhase, LevelOutcome, ObjectKind,
    PlayerState, RunState, WorldContext, WorldObject,
};
pub use tick::{TickInput, scroll_world, tick};
