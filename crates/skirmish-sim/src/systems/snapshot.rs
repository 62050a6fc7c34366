//! Snapshot system: builds a complete ArenaSnapshot for the viewing team.
//!
//! This system is read-only and never modifies the registry.

use skirmish_core::entity::{Entity, EntityKind};
use skirmish_core::enums::Team;
use skirmish_core::events::WorldEvent;
use skirmish_core::handle::EntityHandle;
use skirmish_core::state::*;
use skirmish_core::types::SimTime;

use crate::registry::EntityRegistry;
use crate::systems::selection::SelectionController;
use crate::systems::visibility;
use crate::teams::TeamModel;

/// Build the per-tick snapshot from the current registry and team state.
pub fn build_snapshot(
    registry: &EntityRegistry,
    teams: &TeamModel,
    selection: &SelectionController,
    time: &SimTime,
    events: Vec<WorldEvent>,
) -> ArenaSnapshot {
    let viewing_team = selection.viewing_team(registry);

    ArenaSnapshot {
        time: *time,
        viewing_team,
        fogged: !viewing_team.is_spectator(),
        lit_areas: visibility::seer_discs(registry, viewing_team),
        entities: build_entities(registry, teams, viewing_team),
        teams: build_teams(teams),
        selected: selection
            .selected()
            .and_then(|handle| build_info_panel(registry, handle)),
        events,
    }
}

fn build_entities(registry: &EntityRegistry, teams: &TeamModel, viewing_team: Team) -> Vec<EntityView> {
    registry.scan(|handle, entity| {
        Some(EntityView {
            handle,
            kind: entity.unit_kind(),
            team: entity.team,
            position: entity.position,
            rotation: entity.rotation,
            hp: entity.health.current,
            hp_max: entity.health.max,
            visible: teams.is_visible(handle, viewing_team),
            selection: entity.selection.state(),
            beam: build_beam(entity),
        })
    })
}

fn build_beam(entity: &Entity) -> Option<BeamView> {
    let mining = &entity.as_ship()?.mining;
    if !mining.beam_active {
        return None;
    }
    Some(BeamView {
        start: entity.position,
        end: mining.beam_end?,
    })
}

fn build_teams(teams: &TeamModel) -> Vec<TeamView> {
    Team::ALL
        .iter()
        .map(|&team| TeamView {
            team,
            crystals_total: teams.crystals_total(team),
            visible_count: teams.visible_set(team).len(),
        })
        .collect()
}

fn build_info_panel(registry: &EntityRegistry, handle: EntityHandle) -> Option<InfoPanel> {
    let entity = registry.get(handle)?;
    let detail = match &entity.kind {
        EntityKind::Ship(ship) => InfoDetail::Ship {
            crystals_carried: ship.crystals_carried,
            crystal_capacity: ship.crystal_capacity,
        },
        EntityKind::Turret(turret) => InfoDetail::Turret {
            phase: turret.phase,
            current_target: turret.current_target,
        },
        EntityKind::Target(target) => InfoDetail::Target {
            crystals_stored: target.crystals_stored,
            capacity: target.capacity,
        },
        EntityKind::Crystal(_) | EntityKind::Projectile(_) => return None,
    };
    Some(InfoPanel {
        handle,
        kind: entity.unit_kind(),
        team: entity.team,
        hp: entity.health.current,
        hp_max: entity.health.max,
        controlled: entity.selection.controlled,
        detail,
    })
}
