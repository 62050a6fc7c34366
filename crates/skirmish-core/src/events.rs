//! Side effects emitted by the simulation for external collaborators.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fire-and-forget requests to the presentation layer. The simulation never
/// tracks what the collaborator does with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorldEvent {
    /// Spawn an explosion visual at a world position.
    Explosion { position: Vec2 },
    /// Move the camera so it is centred on a world position.
    RecenterCamera { position: Vec2 },
}

/// Receiver for [`WorldEvent`]s, injected into the simulation at
/// construction.
pub trait WorldEvents {
    fn emit(&mut self, event: &WorldEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvents;

impl WorldEvents for NullEvents {
    fn emit(&mut self, _event: &WorldEvent) {}
}

/// Keeps every event, in emission order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<WorldEvent>,
}

impl WorldEvents for EventLog {
    fn emit(&mut self, event: &WorldEvent) {
        self.events.push(event.clone());
    }
}
