//! Events emitted by the simulation for UI and audio
//!
//! The tick pushes events onto `WorldContext::events`; the host drains them
//! after each tick and fans them out to whatever sinks it has. Sinks never
//! feed anything back into the simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::ObjectKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Coin picked up; carries the new total
    CoinCollected(u32),
    /// Lives total changed (rock or life token); carries the new total
    LifeChanged(i32),
    /// Object struck by the boat, at the effect origin
    ObjectHit { kind: ObjectKind, origin: Vec3 },
    /// Too many rocks hit
    RunFailed,
    /// Course completed
    RunSucceeded,
    /// A challenge row was reclaimed by the garbage collector
    RowDestroyed { row_index: u32 },
    /// New level set up and waiting for start
    LevelReady { level: u32 },
}

/// Consumer of simulation events (HUD text, sound cues, ...)
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Forward every event to each sink, in order
pub fn dispatch(events: &[GameEvent], sinks: &mut [&mut dyn EventSink]) {
    for event in events {
        for sink in sinks.iter_mut() {
            sink.on_event(event);
        }
    }
}

/// Sink that just keeps what it was sent
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
