//! Prototype shapes supplied by the asset loader
//!
//! Model loading happens outside the simulation, once, before the first tick.
//! The simulation only needs each prototype's box extents and instance scale
//! so it can derive world-space bounds for everything it spawns.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Prototypes the world instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrototypeId {
    Boat,
    Rock,
    Coin,
    Life,
    Column,
    StarterBay,
}

impl PrototypeId {
    pub const ALL: [PrototypeId; 6] = [
        PrototypeId::Boat,
        PrototypeId::Rock,
        PrototypeId::Coin,
        PrototypeId::Life,
        PrototypeId::Column,
        PrototypeId::StarterBay,
    ];
}

/// Model-space half extents plus the scale every instance is created with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrototypeShape {
    pub half_extents: Vec3,
    pub scale: Vec3,
}

impl PrototypeShape {
    pub fn new(half_extents: Vec3, scale: f32) -> Self {
        Self {
            half_extents,
            scale: Vec3::splat(scale),
        }
    }

    /// Half extents of a placed instance
    #[inline]
    pub fn world_half_extents(&self) -> Vec3 {
        self.half_extents * self.scale
    }
}

/// Clone-on-demand access to loaded prototypes
pub trait AssetProvider {
    fn instance(&self, id: PrototypeId) -> Option<PrototypeShape>;
}

/// In-memory prototype table, filled by the loader or from a JSON manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetLibrary {
    shapes: BTreeMap<PrototypeId, PrototypeShape>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes matching the stock boat/rock/coin/life/column/bay models
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.insert(PrototypeId::Boat, PrototypeShape::new(Vec3::new(6.0, 14.0, 18.0), 0.45));
        lib.insert(PrototypeId::Rock, PrototypeShape::new(Vec3::splat(0.6), 5.0));
        lib.insert(PrototypeId::Coin, PrototypeShape::new(Vec3::new(0.01, 0.0125, 0.0025), 200.0));
        lib.insert(PrototypeId::Life, PrototypeShape::new(Vec3::new(25.0, 25.0, 6.25), 0.08));
        lib.insert(PrototypeId::Column, PrototypeShape::new(Vec3::new(4.0, 40.0, 4.0), 1.0));
        lib.insert(
            PrototypeId::StarterBay,
            PrototypeShape {
                half_extents: Vec3::new(20.0, 2.0, 30.0),
                scale: Vec3::new(3.0, 1.0, 1.0),
            },
        );
        lib
    }

    /// Load a manifest of the form `{ "shapes": { "rock": { ... }, ... } }`
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let lib: AssetLibrary = serde_json::from_str(json)?;
        for (id, shape) in &lib.shapes {
            if shape.world_half_extents().min_element() <= 0.0 {
                return Err(WorldError::DegeneratePrototype(*id));
            }
        }
        log::info!("Loaded {} prototype shapes", lib.shapes.len());
        Ok(lib)
    }

    pub fn insert(&mut self, id: PrototypeId, shape: PrototypeShape) {
        self.shapes.insert(id, shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl AssetProvider for AssetLibrary {
    fn instance(&self, id: PrototypeId) -> Option<PrototypeShape> {
        self.shapes.get(&id).copied()
    }
}

/// Every prototype the world needs, resolved once at startup
#[derive(Debug, Clone, Copy)]
pub struct Prototypes {
    pub boat: PrototypeShape,
    pub rock: PrototypeShape,
    pub coin: PrototypeShape,
    pub life: PrototypeShape,
    pub column: PrototypeShape,
    pub starter_bay: PrototypeShape,
}

impl Prototypes {
    /// Fails on the first prototype the provider cannot supply
    pub fn resolve(provider: &dyn AssetProvider) -> Result<Self, WorldError> {
        let get = |id| provider.instance(id).ok_or(WorldError::MissingPrototype(id));
        Ok(Self {
            boat: get(PrototypeId::Boat)?,
            rock: get(PrototypeId::Rock)?,
            coin: get(PrototypeId::Coin)?,
            life: get(PrototypeId::Life)?,
            column: get(PrototypeId::Column)?,
            starter_bay: get(PrototypeId::StarterBay)?,
        })
    }

    pub fn get(&self, id: PrototypeId) -> PrototypeShape {
        match id {
            PrototypeId::Boat => self.boat,
            PrototypeId::Rock => self.rock,
            PrototypeId::Coin => self.coin,
            PrototypeId::Life => self.life,
            PrototypeId::Column => self.column,
            PrototypeId::StarterBay => self.starter_bay,
        }
    }
}
