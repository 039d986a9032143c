//! Sea Runner - an endless-runner boating game
//!
//! Core modules:
//! - `sim`: Deterministic scrolling world simulation (generation, collisions, run state)
//! - `error`: Startup/precondition errors
//! - `tuning`: Data-driven game balance
//! - `assets`: Prototype shapes supplied by the asset loader
//! - `settings`: Player preferences
//! - `audio`: Sound cue sink driven by simulation events
//! - `hud`: Heads-up display and level-end screen model
//! - `snapshot`: Per-frame render snapshot and scene sync

pub mod assets;
pub mod audio;
pub mod error;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use assets::{AssetLibrary, AssetProvider, PrototypeId, PrototypeShape};
pub use error::WorldError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Fixed world layout constants
pub mod consts {
    /// Cells per challenge row
    pub const ROW_CELLS: usize = 5;
    /// Lateral distance between row cells
    pub const CELL_SPACING: f32 = 11.0;
    /// X of cell 0 (cells run left to right)
    pub const CELL_ORIGIN_X: f32 = -20.0;

    /// Rocks sit low in the water, collectibles float above it
    pub const ROCK_Y: f32 = 3.0;
    pub const COLLECTIBLE_Y: f32 = 8.0;

    /// Background columns stand either side of the corridor
    pub const COLUMN_X: f32 = 60.0;
    pub const COLUMN_Y: f32 = -10.0;

    /// Boat rests on the water line
    pub const PLAYER_Y: f32 = 0.0;

    /// Coin/life spin (radians per running tick)
    pub const COLLECTIBLE_SPIN: f32 = 0.01;

    /// Starter bay placement, removed once it drifts past the camera
    pub const STARTER_BAY_X: f32 = 20.0;
    pub const STARTER_BAY_Z: f32 = 120.0;
    pub const STARTER_BAY_REMOVE_Z: f32 = 200.0;

    /// Progress bar width in HUD pixels at 100%
    pub const PROGRESS_BAR_WIDTH: f32 = 200.0;
}

/// World-space X of a row cell
#[inline]
pub fn cell_x(cell: usize) -> f32 {
    cell as f32 * consts::CELL_SPACING + consts::CELL_ORIGIN_X
}

/// Offset on the XZ plane at `radius` and `angle` (radians)
#[inline]
pub fn planar_offset(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}
