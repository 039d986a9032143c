//! Data-driven game balance
//!
//! Every number the simulation ramps, thresholds or counts against lives
//! here so levels can be rebalanced from JSON without touching the tick.

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ===
    /// Speed gained per running tick
    pub acceleration: f32,
    /// Speed lost per tick once the level is over
    pub deceleration: f32,
    /// Speed preset per completed level when the next level (or a restart) begins
    pub level_start_speed_step: f32,

    // === Course ===
    /// Course length for level `n` is `n * course_length_per_level`
    pub course_length_per_level: f32,
    /// Run fails once lives collected drop to this value
    pub failure_lives: i32,

    // === Player ===
    /// Lateral distance per tick of steering
    pub steer_step: f32,
    pub player_min_x: f32,
    pub player_max_x: f32,
    /// Z of the play line the boat sits on
    pub play_line_z: f32,

    // === Generation / lifecycle ===
    /// Z at which new rows and columns appear
    pub horizon_z: f32,
    /// Front element must pass this Z before the next one is appended
    pub spawn_threshold_z: f32,
    /// Rows/columns/debris past this Z are eligible for collection
    pub gc_threshold_z: f32,
    /// Z spacing of the rows/columns seeded at level setup
    pub row_spacing: f32,
    /// Rows and columns seeded at level setup
    pub initial_rows: u32,

    // === Destruction effect ===
    pub debris_per_hit: u32,
    pub debris_radius: f32,
    /// Fragments are destroyed once their lifetime exceeds this
    pub debris_max_lifetime: u32,
    /// Ticks the outward animation takes before clamping
    pub debris_anim_ticks: u32,

    // === Camera ===
    /// Ticks of camera fly-in between start and running
    pub intro_ticks: u32,
    /// Orbit angle step while waiting for start
    pub camera_orbit_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            acceleration: 0.001,
            deceleration: 0.1,
            level_start_speed_step: 0.1,

            course_length_per_level: 1000.0,
            failure_lives: -5,

            steer_step: 0.5,
            player_min_x: -20.0,
            player_max_x: 25.0,
            play_line_z: 60.0,

            horizon_z: -1400.0,
            spawn_threshold_z: -1300.0,
            gc_threshold_z: 100.0,
            row_spacing: 60.0,
            initial_rows: 60,

            debris_per_hit: 6,
            debris_radius: 15.0,
            debris_max_lifetime: 500,
            debris_anim_ticks: 18,

            intro_ticks: 240,
            camera_orbit_step: 0.005,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Course length for a level
    pub fn course_length(&self, level: u32) -> f32 {
        self.course_length_per_level * level as f32
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.acceleration < 0.0 || self.deceleration <= 0.0 {
            return Err(WorldError::InvalidTuning("speed ramp must be non-negative"));
        }
        if self.course_length_per_level <= 0.0 {
            return Err(WorldError::InvalidTuning("course length must be positive"));
        }
        if self.failure_lives >= 0 {
            return Err(WorldError::InvalidTuning("failure lives must be negative"));
        }
        if self.player_min_x >= self.player_max_x {
            return Err(WorldError::InvalidTuning("player x bounds are inverted"));
        }
        if self.horizon_z >= self.spawn_threshold_z || self.spawn_threshold_z >= self.gc_threshold_z {
            return Err(WorldError::InvalidTuning(
                "expected horizon < spawn threshold < gc threshold",
            ));
        }
        if self.row_spacing <= 0.0 {
            return Err(WorldError::InvalidTuning("row spacing must be positive"));
        }
        if self.debris_anim_ticks == 0 {
            return Err(WorldError::InvalidTuning("debris animation needs at least one tick"));
        }
        Ok(())
    }
}
