//! Arena snapshot: everything render and UI collaborators read after a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::{SelectionState, Team, TurretPhase, UnitKind};
use crate::events::WorldEvent;
use crate::handle::EntityHandle;
use crate::types::{Disc, SimTime};

/// Complete per-tick output, from the point of view of the active viewing
/// team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time: SimTime,
    /// Controlled ship's team, or Spectator when nothing is controlled.
    pub viewing_team: Team,
    /// False only for Spectator, which sees without fog.
    pub fogged: bool,
    /// Seer discs of the viewing team, for drawing the lit areas.
    pub lit_areas: Vec<Disc>,
    /// Every alive entity, in registration order.
    pub entities: Vec<EntityView>,
    pub teams: Vec<TeamView>,
    /// Info panel contents for the selected entity.
    pub selected: Option<InfoPanel>,
    /// World events emitted during this tick.
    pub events: Vec<WorldEvent>,
}

impl ArenaSnapshot {
    /// Handles the viewing team can currently see.
    pub fn visible_handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.entities.iter().filter(|e| e.visible).map(|e| e.handle)
    }

    pub fn team(&self, team: Team) -> Option<&TeamView> {
        self.teams.iter().find(|t| t.team == team)
    }
}

/// Render-facing view of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub handle: EntityHandle,
    pub kind: UnitKind,
    pub team: Team,
    pub position: Vec2,
    pub rotation: f32,
    pub hp: i32,
    pub hp_max: i32,
    /// Whether the viewing team can see it.
    pub visible: bool,
    pub selection: SelectionState,
    /// Mining beam segment, when the ship's beam is on.
    pub beam: Option<BeamView>,
}

/// A drawn laser segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamView {
    pub start: Vec2,
    pub end: Vec2,
}

/// HUD line for one playing team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamView {
    pub team: Team,
    pub crystals_total: f32,
    pub visible_count: usize,
}

/// Stat block for the selected entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoPanel {
    pub handle: EntityHandle,
    pub kind: UnitKind,
    pub team: Team,
    pub hp: i32,
    pub hp_max: i32,
    pub controlled: bool,
    pub detail: InfoDetail,
}

/// Kind-specific part of the info panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InfoDetail {
    Ship {
        crystals_carried: u32,
        crystal_capacity: u32,
    },
    Turret {
        phase: TurretPhase,
        current_target: Option<EntityHandle>,
    },
    Target {
        crystals_stored: u32,
        capacity: u32,
    },
}
