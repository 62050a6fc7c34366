//! Scenario files: JSON descriptions of an arena and a scripted input
//! timeline.
//!
//! ```json
//! {
//!   "config": { "seed": 7, "control_loss": "clear" },
//!   "entities": [
//!     { "kind": "Ship", "team": "Red", "position": [-300.0, 0.0] },
//!     { "kind": "Crystal", "position": [0.0, 0.0], "crystals": 12 }
//!   ],
//!   "script": [
//!     { "tick": 0, "command": { "type": "SetWaypoint", "position": [0.0, 0.0] } }
//!   ]
//! }
//! ```
//!
//! A scenario without entities plays on the default arena. Every unit except
//! a crystal must name its team, and that team cannot be Spectator.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use skirmish_core::commands::PlayerCommand;
use skirmish_core::entity::Entity;
use skirmish_core::enums::{Team, UnitKind};
use skirmish_core::error::SimError;

use crate::engine::{SimConfig, SimulationEngine};
use crate::world_setup;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("entity {index} in scenario: {source}")]
    Entity {
        index: usize,
        #[source]
        source: SimError,
    },
}

/// One entity to place before the first tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub kind: UnitKind,
    /// Owning team. Crystals may leave it out.
    #[serde(default)]
    pub team: Option<Team>,
    pub position: Vec2,
    /// Facing in radians. Projectiles fly along it.
    #[serde(default)]
    pub rotation: f32,
    /// Overrides the kind's default maximum hit points.
    #[serde(default)]
    pub hp: Option<i32>,
    /// Units in a crystal deposit, carried by a ship, or stored in a depot.
    /// A crystal without it gets a random size.
    #[serde(default)]
    pub crystals: Option<u32>,
}

impl SpawnSpec {
    /// The team this entity is filed under. Crystals are always neutral.
    pub fn team(&self) -> Result<Team, SimError> {
        match (self.kind, self.team) {
            (UnitKind::Crystal, _) => Ok(Team::Spectator),
            (_, Some(team)) if !team.is_spectator() => Ok(team),
            (kind, _) => Err(SimError::SpectatorOwned(kind)),
        }
    }

    pub fn build(&self, config: &SimConfig) -> Result<Entity, SimError> {
        let team = self.team()?;
        let crystals = self.crystals.unwrap_or(0);
        let mut entity = match self.kind {
            UnitKind::Ship => {
                let mut entity = world_setup::ship(team, self.position, config);
                if let Some(ship) = entity.as_ship_mut() {
                    ship.crystals_carried = crystals.min(ship.crystal_capacity);
                }
                entity
            }
            UnitKind::Turret => Entity::turret(team, self.position),
            UnitKind::Target => {
                let mut entity = Entity::target(team, self.position);
                if let Some(target) = entity.as_target_mut() {
                    target.crystals_stored = crystals.min(target.capacity);
                }
                entity
            }
            UnitKind::Crystal => Entity::crystal(self.position, crystals),
            UnitKind::Projectile => {
                let mut entity =
                    Entity::projectile(team, self.position, Vec2::from_angle(self.rotation));
                if let Some(shot) = entity.as_projectile_mut() {
                    shot.damage = config.projectile_damage;
                }
                entity
            }
        };
        entity.rotation = self.rotation;
        if let Some(hp) = self.hp {
            entity = entity.with_max_hp(hp);
        }
        Ok(entity)
    }
}

/// A player command fed in at a given tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Number of ticks already run when the command is queued; 0 means
    /// before the first tick.
    pub tick: u64,
    pub command: PlayerCommand,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: SimConfig,
    pub entities: Vec<SpawnSpec>,
    pub script: Vec<ScriptedInput>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check that every listed entity can be spawned.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for (index, spec) in self.entities.iter().enumerate() {
            spec.team()
                .map_err(|source| ScenarioError::Entity { index, source })?;
        }
        Ok(())
    }

    /// Build an engine with every entity registered, in file order. Entities
    /// that fail [`Scenario::validate`] are skipped.
    pub fn build_engine(&self) -> SimulationEngine {
        let mut engine = SimulationEngine::new(self.config.clone());
        if self.entities.is_empty() {
            engine.setup_arena();
        }
        for (index, spec) in self.entities.iter().enumerate() {
            let spawned = spec
                .build(&self.config)
                .and_then(|entity| engine.spawn(entity));
            if let Err(err) = spawned {
                warn!(index, %err, "scenario entity skipped");
            }
        }
        engine
    }

    /// Commands scheduled for `tick`, in file order.
    pub fn commands_at(&self, tick: u64) -> impl Iterator<Item = &PlayerCommand> + '_ {
        self.script
            .iter()
            .filter(move |input| input.tick == tick)
            .map(|input| &input.command)
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::enums::ControlLossPolicy;

    use super::*;

    const SAMPLE: &str = r#"{
        "config": { "seed": 7, "control_loss": "clear" },
        "entities": [
            { "kind": "Ship", "team": "Red", "position": [-300.0, 0.0], "crystals": 9 },
            { "kind": "Target", "team": "Red", "position": [-350.0, 0.0], "crystals": 4, "hp": 3 },
            { "kind": "Crystal", "position": [0.0, 0.0], "crystals": 12 },
            { "kind": "Crystal", "position": [50.0, 0.0] }
        ],
        "script": [
            { "tick": 2, "command": { "type": "SetMineHeld", "held": true } },
            { "tick": 2, "command": { "type": "SelectIndex", "index": 0 } }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let scenario = Scenario::from_json(SAMPLE).unwrap();
        assert_eq!(scenario.config.seed, 7);
        assert_eq!(scenario.config.control_loss, ControlLossPolicy::Clear);
        // Unlisted fields keep their defaults.
        assert_eq!(scenario.config.tick_rate, 60);
        assert_eq!(scenario.entities.len(), 4);
        assert_eq!(scenario.commands_at(2).count(), 2);
        assert_eq!(scenario.commands_at(3).count(), 0);
    }

    #[test]
    fn test_build_applies_overrides() {
        let scenario = Scenario::from_json(SAMPLE).unwrap();
        let config = &scenario.config;

        let ship = scenario.entities[0].build(config).unwrap();
        assert_eq!(ship.as_ship().unwrap().crystals_carried, 5, "clamped to capacity");

        let target = scenario.entities[1].build(config).unwrap();
        assert_eq!(target.as_target().unwrap().crystals_stored, 4);
        assert_eq!(target.health.max, 3);

        let engine = scenario.build_engine();
        assert_eq!(engine.registry().len(), 4);
        let sizes = engine.registry().scan(|_, e| match &e.kind {
            skirmish_core::entity::EntityKind::Crystal(c) => Some(c.remaining_units),
            _ => None,
        });
        assert_eq!(sizes[0], 12);
        assert!((10..=20).contains(&sizes[1]));
    }

    #[test]
    fn test_empty_scenario_uses_default_arena() {
        let scenario = Scenario::from_json("{}").unwrap();
        assert!(scenario.build_engine().registry().len() > 0);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Scenario::from_json(r#"{ "entities": [ { "kind": "Dragon" } ] }"#).unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));

        let err = Scenario::load(Path::new("/nonexistent/skirmish.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/skirmish.json"));
    }

    #[test]
    fn test_units_need_a_playing_team() {
        let teamless = r#"{ "entities": [
            { "kind": "Ship", "team": "Red", "position": [100.0, 0.0] },
            { "kind": "Turret", "position": [0.0, 0.0] }
        ] }"#;
        let err = Scenario::from_json(teamless).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Entity {
                index: 1,
                source: SimError::SpectatorOwned(UnitKind::Turret)
            }
        ));

        let spectator = r#"{ "entities": [
            { "kind": "Ship", "team": "Spectator", "position": [-100.0, 0.0] }
        ] }"#;
        assert!(Scenario::from_json(spectator).is_err());

        // Built by hand, past validation: the bad entry is skipped.
        let mut scenario = Scenario::from_json(SAMPLE).unwrap();
        scenario.entities.push(SpawnSpec {
            kind: UnitKind::Turret,
            team: None,
            position: Vec2::ZERO,
            rotation: 0.0,
            hp: None,
            crystals: None,
        });
        let engine = scenario.build_engine();
        assert_eq!(engine.registry().len(), 4);
        let owners = engine.registry().scan(|_, e| match e.unit_kind() {
            UnitKind::Crystal => None,
            _ => Some(e.team),
        });
        assert!(owners.iter().all(|team| !team.is_spectator()));
    }
}
