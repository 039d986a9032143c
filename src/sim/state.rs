//! World state and core simulation types
//!
//! Everything one run mutates lives in `WorldContext`, which is passed
//! explicitly to every simulation operation.

use std::collections::VecDeque;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::events::GameEvent;
use crate::assets::{AssetProvider, PrototypeId, Prototypes};
use crate::consts::*;
use crate::error::WorldError;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Context built, no level set up yet
    NotReady,
    /// Level set up, camera orbiting, waiting for the player to start
    Ready,
    /// Camera flying in behind the boat
    Intro { ticks_left: u32 },
    /// Boat moving, world scrolling
    Running,
    /// Level finished, world decelerating
    LevelOver(LevelOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Succeeded,
    Failed,
}

/// What a row cell can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Rock,
    Coin,
    Life,
}

/// Gameplay effect of striking an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    CoinDelta(i32),
    LifeDelta(i32),
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Rock, ObjectKind::Coin, ObjectKind::Life];

    /// Effect mapping table: the only place hit outcomes are decided
    pub const fn effect(self) -> Effect {
        match self {
            ObjectKind::Rock => Effect::LifeDelta(-1),
            ObjectKind::Coin => Effect::CoinDelta(1),
            ObjectKind::Life => Effect::LifeDelta(1),
        }
    }

    pub const fn prototype(self) -> PrototypeId {
        match self {
            ObjectKind::Rock => PrototypeId::Rock,
            ObjectKind::Coin => PrototypeId::Coin,
            ObjectKind::Life => PrototypeId::Life,
        }
    }

    /// Height the object floats at
    pub const fn rest_y(self) -> f32 {
        match self {
            ObjectKind::Rock => ROCK_Y,
            ObjectKind::Coin | ObjectKind::Life => COLLECTIBLE_Y,
        }
    }

    /// Coins and lives spin in place
    pub const fn spins(self) -> bool {
        !matches!(self, ObjectKind::Rock)
    }
}

/// An obstacle or collectible inside a challenge row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: u32,
    pub kind: ObjectKind,
    /// Cell index within the row (0..ROW_CELLS)
    pub cell: u8,
    /// Position relative to the row (z is always 0)
    pub local: Vec3,
    /// World-space half extents (prototype extents * scale)
    pub half_extents: Vec3,
    /// Spin angle around the vertical axis (render only)
    #[serde(default)]
    pub spin: f32,
}

impl WorldObject {
    #[inline]
    pub fn position(&self, row_z: f32) -> Vec3 {
        self.local + Vec3::new(0.0, 0.0, row_z)
    }

    #[inline]
    pub fn bounds(&self, row_z: f32) -> Aabb {
        Aabb::from_center(self.position(row_z), self.half_extents)
    }
}

/// A transverse slot of up to `ROW_CELLS` objects sharing one z
///
/// Cells are stable slots: removing an object empties its slot without
/// shifting the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeRow {
    pub row_index: u32,
    pub z: f32,
    pub cells: [Option<WorldObject>; ROW_CELLS],
}

impl ChallengeRow {
    pub fn new(row_index: u32, z: f32) -> Self {
        Self {
            row_index,
            z,
            cells: Default::default(),
        }
    }

    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.cells.iter().flatten()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut WorldObject> {
        self.cells.iter_mut().flatten()
    }

    pub fn len(&self) -> usize {
        self.objects().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Remove the object in `cell`, if any
    pub fn take(&mut self, cell: usize) -> Option<WorldObject> {
        self.cells.get_mut(cell).and_then(Option::take)
    }
}

/// Decorative column at the side of the corridor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundColumn {
    pub id: u32,
    pub index: u32,
    pub position: Vec3,
    /// Rotation jitter around the column's long axis
    pub rotation: f32,
}

/// Transient visual debris thrown out by a hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebrisFragment {
    pub id: u32,
    /// Where the boat was when the fragment was thrown
    pub from: Vec3,
    /// Hit origin the fragment is flung around
    pub origin: Vec3,
    /// Outward offset from `origin`
    pub offset: Vec3,
    /// Current animated position
    pub position: Vec3,
    /// Ticks alive
    pub lifetime: u32,
}

impl DebrisFragment {
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.origin + self.offset
    }
}

/// The player's boat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Set once the level ends; the boat leaves the play field
    pub flying_away: bool,
}

impl PlayerState {
    pub fn new(play_line_z: f32, half_extents: Vec3) -> Self {
        Self {
            position: Vec3::new(0.0, PLAYER_Y, play_line_z),
            half_extents,
            flying_away: false,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    /// Move sideways by `dx`, keeping inside the corridor
    pub fn steer(&mut self, dx: f32, min_x: f32, max_x: f32) {
        self.position.x = (self.position.x + dx).clamp(min_x, max_x);
    }
}

/// Counters for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub coins_collected: u32,
    /// Goes negative as rocks are hit
    pub lives_collected: i32,
    pub course_progress: f32,
    pub course_length: f32,
    pub speed: f32,
    pub level_over: bool,
    pub level: u32,
    /// Columns spawned this level
    pub column_count: u32,
    /// Rows spawned this level
    pub row_count: u32,
}

impl RunState {
    pub fn new(course_length: f32) -> Self {
        Self {
            coins_collected: 0,
            lives_collected: 0,
            course_progress: 0.0,
            course_length,
            speed: 0.0,
            level_over: false,
            level: 1,
            column_count: 0,
            row_count: 0,
        }
    }

    /// Level progress 0.0 to 1.0
    pub fn percent_complete(&self) -> f32 {
        if self.course_length <= 0.0 {
            return 0.0;
        }
        (self.course_progress / self.course_length).clamp(0.0, 1.0)
    }
}

/// Camera placement (render only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    /// Orbit angle while waiting for start
    pub orbit_angle: f32,
    /// Where the fly-in started from
    pub intro_from: Vec3,
}

/// Orbit radius/height around the boat before the run starts
pub const CAMERA_ORBIT_RADIUS: f32 = 20.0;
pub const CAMERA_ORBIT_HEIGHT: f32 = 30.0;
/// Chase position behind the boat once running
pub const CAMERA_CHASE: Vec3 = Vec3::new(0.0, 30.0, 100.0);
/// Camera start position at level setup
pub const CAMERA_SETUP: Vec3 = Vec3::new(15.0, 12.0, 50.0);

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: CAMERA_SETUP,
            orbit_angle: 0.0,
            intro_from: CAMERA_SETUP,
        }
    }
}

/// All state for one run
#[derive(Debug, Clone)]
pub struct WorldContext {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub(crate) prototypes: Prototypes,
    pub phase: GamePhase,
    pub run: RunState,
    pub player: PlayerState,
    /// Newest first
    pub rows: VecDeque<ChallengeRow>,
    /// Newest first
    pub columns: VecDeque<BackgroundColumn>,
    pub debris: Vec<DebrisFragment>,
    /// Shore the boat starts in; dropped once it scrolls away
    pub starter_bay: Option<Vec3>,
    pub camera: CameraRig,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl WorldContext {
    /// Build a context; every prototype must already be loaded
    pub fn new(seed: u64, tuning: Tuning, assets: &dyn AssetProvider) -> Result<Self, WorldError> {
        tuning.validate()?;
        let prototypes = Prototypes::resolve(assets)?;
        let player = PlayerState::new(tuning.play_line_z, prototypes.boat.world_half_extents());
        let run = RunState::new(tuning.course_length(1));

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            prototypes,
            phase: GamePhase::NotReady,
            run,
            player,
            rows: VecDeque::new(),
            columns: VecDeque::new(),
            debris: Vec::new(),
            starter_bay: None,
            camera: CameraRig::default(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn prototypes(&self) -> &Prototypes {
        &self.prototypes
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Objects still in play across all rows
    pub fn object_count(&self) -> usize {
        self.rows.iter().map(ChallengeRow::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLibrary;

    #[test]
    fn test_effect_table() {
        assert_eq!(ObjectKind::Rock.effect(), Effect::LifeDelta(-1));
        assert_eq!(ObjectKind::Coin.effect(), Effect::CoinDelta(1));
        assert_eq!(ObjectKind::Life.effect(), Effect::LifeDelta(1));
    }

    #[test]
    fn test_row_take_keeps_other_slots() {
        let mut row = ChallengeRow::new(0, -60.0);
        for cell in 0..ROW_CELLS {
            row.cells[cell] = Some(WorldObject {
                id: cell as u32,
                kind: ObjectKind::Coin,
                cell: cell as u8,
                local: Vec3::new(crate::cell_x(cell), COLLECTIBLE_Y, 0.0),
                half_extents: Vec3::ONE,
                spin: 0.0,
            });
        }
        let taken = row.take(2).unwrap();
        assert_eq!(taken.cell, 2);
        assert_eq!(row.len(), 4);
        assert!(row.cells[2].is_none());
        assert_eq!(row.cells[3].as_ref().map(|o| o.cell), Some(3));
        assert!(row.take(2).is_none());
        assert!(row.take(99).is_none());
    }

    #[test]
    fn test_player_steer_clamps() {
        let mut player = PlayerState::new(60.0, Vec3::ONE);
        player.steer(-100.0, -20.0, 25.0);
        assert_eq!(player.position.x, -20.0);
        player.steer(100.0, -20.0, 25.0);
        assert_eq!(player.position.x, 25.0);
    }

    #[test]
    fn test_new_context_starts_not_ready() {
        let ctx = WorldContext::new(7, Tuning::default(), &AssetLibrary::builtin()).unwrap();
        assert_eq!(ctx.phase, GamePhase::NotReady);
        assert_eq!(ctx.run.course_length, 1000.0);
        assert_eq!(ctx.player.position.z, 60.0);
        assert!(ctx.rows.is_empty());
    }

    #[test]
    fn test_new_context_requires_assets() {
        let result = WorldContext::new(7, Tuning::default(), &AssetLibrary::new());
        assert!(matches!(result, Err(WorldError::MissingPrototype(PrototypeId::Boat))));
    }
}
