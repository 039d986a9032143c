//! Per-frame render snapshot and retained-scene sync
//!
//! The renderer never touches `WorldContext`. After each tick the host builds
//! a `RenderSnapshot` and either draws it directly or feeds it to `SceneSync`,
//! which turns successive snapshots into add/remove/move calls on a scene.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::PrototypeId;
use crate::consts::PLAYER_Y;
use crate::sim::{GamePhase, WorldContext};

/// Stable identity of a drawable across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKey {
    Boat,
    StarterBay,
    Object(u32),
    Column(u32),
    Debris(u32),
}

/// What to draw for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Prototype(PrototypeId),
    /// Small debris cube
    Debris,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub key: NodeKey,
    pub kind: NodeKind,
    pub position: Vec3,
    /// Yaw in radians
    pub rotation: f32,
    pub scale: Vec3,
}

impl RenderNode {
    fn same_transform(&self, other: &RenderNode) -> bool {
        self.position == other.position
            && self.rotation == other.rotation
            && self.scale == other.scale
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub camera: Vec3,
    /// Camera target
    pub look_at: Vec3,
    /// Level progress 0.0 to 1.0
    pub progress: f32,
    pub nodes: Vec<RenderNode>,
}

impl RenderSnapshot {
    pub fn node(&self, key: NodeKey) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the render snapshot for the current world state
pub fn build_snapshot(ctx: &WorldContext) -> RenderSnapshot {
    let protos = ctx.prototypes();
    let mut nodes = Vec::with_capacity(
        2 + ctx.object_count() + ctx.columns.len() + ctx.debris.len(),
    );

    nodes.push(RenderNode {
        key: NodeKey::Boat,
        kind: NodeKind::Prototype(PrototypeId::Boat),
        position: ctx.player.position,
        rotation: 0.0,
        scale: protos.boat.scale,
    });

    if let Some(bay) = ctx.starter_bay {
        nodes.push(RenderNode {
            key: NodeKey::StarterBay,
            kind: NodeKind::Prototype(PrototypeId::StarterBay),
            position: bay,
            rotation: 0.0,
            scale: protos.starter_bay.scale,
        });
    }

    for row in &ctx.rows {
        for obj in row.objects() {
            let proto = obj.kind.prototype();
            nodes.push(RenderNode {
                key: NodeKey::Object(obj.id),
                kind: NodeKind::Prototype(proto),
                position: obj.position(row.z),
                rotation: obj.spin,
                scale: protos.get(proto).scale,
            });
        }
    }

    for column in &ctx.columns {
        nodes.push(RenderNode {
            key: NodeKey::Column(column.id),
            kind: NodeKind::Prototype(PrototypeId::Column),
            position: column.position,
            rotation: column.rotation,
            scale: protos.column.scale,
        });
    }

    for fragment in &ctx.debris {
        nodes.push(RenderNode {
            key: NodeKey::Debris(fragment.id),
            kind: NodeKind::Debris,
            position: fragment.position,
            rotation: 0.0,
            scale: Vec3::ONE,
        });
    }

    RenderSnapshot {
        tick: ctx.time_ticks,
        phase: ctx.phase,
        camera: ctx.camera.position,
        look_at: Vec3::new(ctx.player.position.x, PLAYER_Y, ctx.player.position.z),
        progress: ctx.run.percent_complete(),
        nodes,
    }
}

/// Retained-mode scene the renderer exposes
pub trait Scene {
    fn add(&mut self, node: &RenderNode);
    fn remove(&mut self, key: NodeKey);
    fn set_transform(&mut self, node: &RenderNode);
}

/// Counts of scene calls made by one sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub added: usize,
    pub removed: usize,
    pub moved: usize,
}

/// Diffs successive snapshots into scene calls
#[derive(Debug, Default)]
pub struct SceneSync {
    live: HashMap<NodeKey, RenderNode>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes currently in the scene
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Bring `scene` in line with `snapshot`
    pub fn apply(&mut self, snapshot: &RenderSnapshot, scene: &mut dyn Scene) -> SyncStats {
        let mut stats = SyncStats::default();
        let mut next = HashMap::with_capacity(snapshot.nodes.len());

        for node in &snapshot.nodes {
            match self.live.remove(&node.key) {
                Some(prev) if prev.kind == node.kind => {
                    if !prev.same_transform(node) {
                        scene.set_transform(node);
                        stats.moved += 1;
                    }
                }
                Some(_) => {
                    scene.remove(node.key);
                    scene.add(node);
                    stats.removed += 1;
                    stats.added += 1;
                }
                None => {
                    scene.add(node);
                    stats.added += 1;
                }
            }
            next.insert(node.key, *node);
        }

        // Whatever was not seen this frame has left the world
        for key in self.live.keys() {
            scene.remove(*key);
            stats.removed += 1;
        }

        self.live = next;
        if stats.added + stats.removed > 0 {
            log::trace!(
                "Scene sync: +{} -{} ~{}",
                stats.added,
                stats.removed,
                stats.moved
            );
        }
        stats
    }

    /// Remove everything from the scene
    pub fn clear(&mut self, scene: &mut dyn Scene) {
        for (key, _) in self.live.drain() {
            scene.remove(key);
        }
    }
}
