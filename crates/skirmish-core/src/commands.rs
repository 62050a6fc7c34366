//! Commands sent from input and world-driver collaborators to the simulation.
//!
//! Commands are queued and processed at the start of the next tick, in the
//! phase that owns them: world commands in the cleanup phase, player
//! commands in the input phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::handle::EntityHandle;

/// Device-agnostic player input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Select the N-th alive ship (0-based, registration order).
    SelectIndex { index: usize },
    /// Pick whatever selectable entity is nearest to a world position.
    PointerClick { position: Vec2 },
    /// Order the controlled ship to fly to a world position.
    SetWaypoint { position: Vec2 },
    /// Forward gun trigger of the controlled ship.
    SetFireHeld { held: bool },
    /// Mining beam trigger of the controlled ship.
    SetMineHeld { held: bool },
}

/// Lifecycle requests from the world driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorldCommand {
    /// Register a new entity with the given fields.
    Spawn { entity: Entity },
    /// Remove an entity. Stale handles are ignored.
    Destroy { handle: EntityHandle },
}
