//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Team affiliation.
///
/// Spectator never owns units; it only observes, and sees everything.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Team {
    #[default]
    Spectator,
    Red,
    Blue,
}

impl Team {
    /// All teams, in the order their visibility is computed.
    pub const ALL: [Team; 3] = [Team::Red, Team::Blue, Team::Spectator];

    /// Teams that own units and accrue crystals.
    pub const PLAYING: [Team; 2] = [Team::Red, Team::Blue];

    pub fn is_spectator(self) -> bool {
        self == Team::Spectator
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Team::Spectator => "Spectator",
            Team::Red => "Red",
            Team::Blue => "Blue",
        };
        f.write_str(name)
    }
}

/// Discriminant of an entity's kind, without the kind-specific state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Ship,
    Turret,
    Target,
    Crystal,
    Projectile,
}

/// Turret engagement phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretPhase {
    /// No enemy ship in detection range.
    #[default]
    Idle,
    /// A target was picked this tick (first lock or a retarget).
    Acquiring,
    /// Still locked on the same target as last tick.
    Engaging,
}

/// Selection state of a single entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected,
    /// Human-piloted. Implies selected; ships only.
    Controlled,
}

/// What happens to control when the piloted ship is destroyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLossPolicy {
    /// Leave control empty until the player picks another unit.
    Clear,
    /// Hand control to the first alive ship (registration order) of the
    /// lost ship's team, or leave it empty if none remain.
    #[default]
    FallbackToFirstTeamShip,
}
