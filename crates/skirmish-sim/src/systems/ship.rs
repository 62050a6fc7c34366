//! Ship systems: waypoint movement, forward gun, mining beam and crystal
//! deposit.
//!
//! Only the controlled ship receives trigger input. Every ship still flies
//! to an outstanding waypoint, cools its gun and unloads at friendly depots.

use glam::Vec2;

use skirmish_core::constants::TIMER_EPSILON;
use skirmish_core::entity::{DepositReceipt, Entity, EntityKind};
use skirmish_core::handle::EntityHandle;
use skirmish_core::types::{ray_circle_hit, wrap_angle};
use tracing::debug;

use crate::registry::{AliveHandles, EntityRegistry};
use crate::teams::TeamModel;

/// Trigger state held by the pilot of the controlled ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotInput {
    pub fire_held: bool,
    pub mine_held: bool,
}

/// Turn toward and fly to each ship's waypoint. A waypoint within
/// `arrival_distance` is cleared.
pub fn run_movement(registry: &mut EntityRegistry, dt: f32, arrival_distance: f32) {
    for handle in ships(registry).iter() {
        let Some(entity) = registry.get_mut(handle) else {
            continue;
        };
        let position = entity.position;
        let rotation = entity.rotation;
        let Some(ship) = entity.as_ship_mut() else {
            continue;
        };
        let Some(waypoint) = ship.waypoint else {
            continue;
        };

        let to_waypoint = waypoint - position;
        let distance = to_waypoint.length();
        if distance <= arrival_distance {
            ship.waypoint = None;
            continue;
        }

        let max_turn = ship.rotation_speed * dt;
        let desired = to_waypoint.y.atan2(to_waypoint.x);
        let turn = wrap_angle(desired - rotation).clamp(-max_turn, max_turn);
        let step = (ship.speed * dt).min(distance);

        entity.rotation = wrap_angle(rotation + turn);
        entity.position = position + to_waypoint / distance * step;
    }
}

/// Cool every ship's gun and fire the controlled ship's forward gun while the
/// trigger is held.
pub fn run_weapons(
    registry: &mut EntityRegistry,
    controlled: Option<EntityHandle>,
    input: PilotInput,
    dt: f32,
    damage: i32,
    spawns: &mut Vec<Entity>,
) {
    for handle in ships(registry).iter() {
        let Some(entity) = registry.get_mut(handle) else {
            continue;
        };
        let team = entity.team;
        let position = entity.position;
        let facing = Vec2::from_angle(entity.rotation);
        let Some(ship) = entity.as_ship_mut() else {
            continue;
        };
        ship.time_since_last_shot += dt;

        if !input.fire_held || controlled != Some(handle) || ship.fire_rate <= 0.0 {
            continue;
        }
        if ship.time_since_last_shot + TIMER_EPSILON < 1.0 / ship.fire_rate {
            continue;
        }
        ship.time_since_last_shot = 0.0;

        let mut projectile = Entity::projectile(team, position, facing);
        if let Some(shot) = projectile.as_projectile_mut() {
            shot.damage = damage;
        }
        spawns.push(projectile);
    }
}

/// What a mining beam struck this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamHit {
    pub end: Vec2,
    /// The struck body, if the beam stopped on a crystal.
    pub crystal: Option<EntityHandle>,
}

/// Cast a beam from `origin` along `facing`, stopping at the nearest body
/// that blocks beams. `source` is ignored so a ship never hits itself.
pub fn cast_beam(
    registry: &EntityRegistry,
    source: EntityHandle,
    origin: Vec2,
    facing: Vec2,
    range: f32,
) -> BeamHit {
    let hits = registry.scan(|handle, entity| {
        if handle == source {
            return None;
        }
        let radius = entity.kind.beam_blocking_radius()?;
        let distance = ray_circle_hit(origin, facing, range, entity.position, radius)?;
        let is_crystal = matches!(entity.kind, EntityKind::Crystal(_));
        Some((distance, handle, is_crystal))
    });

    // Strict comparison keeps the earliest registered body on a tie.
    let mut nearest: Option<(f32, EntityHandle, bool)> = None;
    for hit in hits {
        if nearest.is_none_or(|(best, _, _)| hit.0 < best) {
            nearest = Some(hit);
        }
    }

    match nearest {
        Some((distance, handle, is_crystal)) => BeamHit {
            end: origin + facing * distance,
            crystal: is_crystal.then_some(handle),
        },
        None => BeamHit {
            end: origin + facing * range,
            crystal: None,
        },
    }
}

/// Run the mining beam of the controlled ship.
///
/// A unit is extracted after `dwell_ticks_per_unit` consecutive ticks of
/// contact with the same crystal. Moving the beam onto another body, a full
/// hold, or releasing the trigger resets the dwell. Every other ship has its
/// beam switched off.
pub fn run_mining(
    registry: &mut EntityRegistry,
    teams: &mut TeamModel,
    controlled: Option<EntityHandle>,
    input: PilotInput,
    dwell_ticks_per_unit: u32,
) {
    for handle in ships(registry).iter() {
        if input.mine_held && controlled == Some(handle) {
            continue;
        }
        if let Some(ship) = registry.get_mut(handle).and_then(Entity::as_ship_mut) {
            ship.mining.cancel();
        }
    }

    let Some(handle) = controlled.filter(|_| input.mine_held) else {
        return;
    };
    let Some((team, origin, facing, range)) = registry.get(handle).and_then(|entity| {
        let ship = entity.as_ship()?;
        Some((
            entity.team,
            entity.position,
            Vec2::from_angle(entity.rotation),
            ship.laser_range,
        ))
    }) else {
        return;
    };

    let hit = cast_beam(registry, handle, origin, facing, range);

    let Some(ship) = registry.get_mut(handle).and_then(Entity::as_ship_mut) else {
        return;
    };
    ship.mining.beam_active = true;
    ship.mining.beam_end = Some(hit.end);

    let crystal = match hit.crystal {
        Some(crystal) if !ship.is_full() => crystal,
        _ => {
            ship.mining.lose_contact();
            return;
        }
    };
    if ship.mining.target != Some(crystal) {
        ship.mining.target = Some(crystal);
        ship.mining.dwell_ticks = 0;
    }
    ship.mining.dwell_ticks += 1;
    if ship.mining.dwell_ticks < dwell_ticks_per_unit {
        return;
    }
    ship.mining.dwell_ticks = 0;

    let extracted = registry
        .get_mut(crystal)
        .and_then(|entity| entity.as_crystal_mut())
        .is_some_and(|deposit| deposit.extract());
    let Some(ship) = registry.get_mut(handle).and_then(Entity::as_ship_mut) else {
        return;
    };
    if !extracted {
        ship.mining.lose_contact();
        return;
    }
    ship.crystals_carried += 1;
    teams.add_crystals(team, 1.0);
    debug!(ship = %handle, %crystal, carried = ship.crystals_carried, "crystal mined");
}

/// Offer a ship's cargo to one depot. Returns `None` unless both handles are
/// alive, the depot is a same-team Target within `range`, and the ship
/// carries something.
pub fn deposit(
    registry: &mut EntityRegistry,
    ship: EntityHandle,
    depot: EntityHandle,
    range: f32,
) -> Option<DepositReceipt> {
    let (team, position, carried) = {
        let entity = registry.get(ship)?;
        (entity.team, entity.position, entity.as_ship()?.crystals_carried)
    };
    if carried == 0 {
        return None;
    }

    let receipt = {
        let entity = registry.get_mut(depot)?;
        if entity.team != team || entity.position.distance(position) > range {
            return None;
        }
        entity.as_target_mut()?.accept(carried)
    };

    if let Some(cargo) = registry.get_mut(ship).and_then(Entity::as_ship_mut) {
        cargo.crystals_carried -= receipt.accepted;
    }
    if receipt.is_partial() && receipt.accepted > 0 {
        debug!(%ship, %depot, rejected = receipt.rejected(), "depot full, crystals kept on board");
    }
    Some(receipt)
}

/// Unload every loaded ship into friendly depots in range, visiting depots in
/// registration order until the hold is empty.
pub fn run_deposits(registry: &mut EntityRegistry, range: f32) {
    let depots = registry.for_each_alive(|e| e.as_target().is_some());
    let loaded = registry.for_each_alive(|e| e.as_ship().is_some_and(|s| s.crystals_carried > 0));

    for ship in loaded.iter() {
        for depot in depots.iter() {
            let still_loaded = registry
                .get(ship)
                .and_then(|e| e.as_ship().map(|s| s.crystals_carried > 0))
                .unwrap_or(false);
            if !still_loaded {
                break;
            }
            deposit(registry, ship, depot, range);
        }
    }
}

fn ships(registry: &EntityRegistry) -> AliveHandles {
    registry.for_each_alive(|e| e.as_ship().is_some())
}

#[cfg(test)]
mod tests {
    use skirmish_core::constants::{DT, PROJECTILE_DAMAGE};
    use skirmish_core::enums::Team;

    use super::*;

    const DWELL: u32 = 60;

    fn ship_at(registry: &mut EntityRegistry, team: Team, position: Vec2) -> EntityHandle {
        registry.register(Entity::ship(team, position))
    }

    fn carried(registry: &EntityRegistry, ship: EntityHandle) -> u32 {
        registry.get(ship).unwrap().as_ship().unwrap().crystals_carried
    }

    fn mine(registry: &mut EntityRegistry, teams: &mut TeamModel, ship: EntityHandle, ticks: u32) {
        let input = PilotInput {
            mine_held: true,
            ..Default::default()
        };
        for _ in 0..ticks {
            run_mining(registry, teams, Some(ship), input, DWELL);
        }
    }

    #[test]
    fn test_waypoint_reached_and_cleared() {
        let mut registry = EntityRegistry::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        registry.get_mut(ship).unwrap().as_ship_mut().unwrap().waypoint = Some(Vec2::new(100.0, 0.0));

        // 200 u/s covers 100 units in 30 ticks; one more tick notices arrival.
        for _ in 0..31 {
            run_movement(&mut registry, DT, 10.0);
        }
        let entity = registry.get(ship).unwrap();
        assert!(entity.position.distance(Vec2::new(100.0, 0.0)) <= 10.0);
        assert!(entity.as_ship().unwrap().waypoint.is_none());
    }

    #[test]
    fn test_movement_turns_toward_waypoint() {
        let mut registry = EntityRegistry::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        registry.get_mut(ship).unwrap().as_ship_mut().unwrap().waypoint = Some(Vec2::new(0.0, 500.0));

        run_movement(&mut registry, DT, 10.0);
        // 12 rad/s for one tick is 0.2 rad of turn.
        let rotation = registry.get(ship).unwrap().rotation;
        assert!((rotation - 0.2).abs() < 1e-5);

        for _ in 0..10 {
            run_movement(&mut registry, DT, 10.0);
        }
        let rotation = registry.get(ship).unwrap().rotation;
        assert!((rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_only_controlled_ship_fires() {
        let mut registry = EntityRegistry::new();
        let pilot = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        let _other = ship_at(&mut registry, Team::Red, Vec2::new(100.0, 0.0));
        let input = PilotInput {
            fire_held: true,
            ..Default::default()
        };

        let mut spawns = Vec::new();
        // Fire rate 2/s: one shot per 30 ticks.
        for _ in 0..60 {
            run_weapons(&mut registry, Some(pilot), input, DT, PROJECTILE_DAMAGE, &mut spawns);
        }
        assert_eq!(spawns.len(), 2);
        assert!(spawns.iter().all(|p| p.position == Vec2::ZERO && p.team == Team::Red));
    }

    #[test]
    fn test_beam_stops_at_first_blocker() {
        let mut registry = EntityRegistry::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        let _blocker = registry.register(Entity::turret(Team::Blue, Vec2::new(100.0, 0.0)));
        let _crystal = registry.register(Entity::crystal(Vec2::new(200.0, 0.0), 10));
        // Depots do not block the beam.
        registry.register(Entity::target(Team::Blue, Vec2::new(50.0, 0.0)));

        let hit = cast_beam(&registry, ship, Vec2::ZERO, Vec2::X, 300.0);
        assert!(hit.crystal.is_none());
        assert!((hit.end.x - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_mining_dwell_one_unit_per_second() {
        let mut registry = EntityRegistry::new();
        let mut teams = TeamModel::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        let crystal = registry.register(Entity::crystal(Vec2::new(100.0, 0.0), 10));

        mine(&mut registry, &mut teams, ship, DWELL - 1);
        assert_eq!(carried(&registry, ship), 0);
        mine(&mut registry, &mut teams, ship, 1);
        assert_eq!(carried(&registry, ship), 1);

        // 2.5 seconds in total: floor(2.5) units.
        mine(&mut registry, &mut teams, ship, DWELL * 3 / 2);
        assert_eq!(carried(&registry, ship), 2);
        assert_eq!(teams.crystals_total(Team::Red), 2.0);

        let remaining = registry.get_mut(crystal).unwrap().as_crystal_mut().unwrap().remaining_units;
        assert_eq!(remaining, 8);
    }

    #[test]
    fn test_switching_crystal_resets_dwell() {
        let mut registry = EntityRegistry::new();
        let mut teams = TeamModel::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        registry.register(Entity::crystal(Vec2::new(100.0, 0.0), 10));
        registry.register(Entity::crystal(Vec2::new(0.0, 100.0), 10));

        mine(&mut registry, &mut teams, ship, DWELL - 10);
        registry.get_mut(ship).unwrap().rotation = std::f32::consts::FRAC_PI_2;
        mine(&mut registry, &mut teams, ship, DWELL - 10);
        assert_eq!(carried(&registry, ship), 0);

        mine(&mut registry, &mut teams, ship, 10);
        assert_eq!(carried(&registry, ship), 1);
    }

    #[test]
    fn test_releasing_trigger_resets_dwell() {
        let mut registry = EntityRegistry::new();
        let mut teams = TeamModel::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        registry.register(Entity::crystal(Vec2::new(100.0, 0.0), 10));

        mine(&mut registry, &mut teams, ship, DWELL - 1);
        run_mining(&mut registry, &mut teams, Some(ship), PilotInput::default(), DWELL);
        let mining = registry.get(ship).unwrap().as_ship().unwrap().mining;
        assert!(!mining.beam_active);
        assert_eq!(mining.dwell_ticks, 0);

        mine(&mut registry, &mut teams, ship, DWELL - 1);
        assert_eq!(carried(&registry, ship), 0);
    }

    #[test]
    fn test_full_ship_cannot_mine() {
        let mut registry = EntityRegistry::new();
        let mut teams = TeamModel::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        registry.get_mut(ship).unwrap().as_ship_mut().unwrap().crystals_carried = 5;
        registry.register(Entity::crystal(Vec2::new(100.0, 0.0), 10));

        mine(&mut registry, &mut teams, ship, DWELL * 2);
        assert_eq!(carried(&registry, ship), 5);
        assert_eq!(teams.crystals_total(Team::Red), 0.0);
    }

    #[test]
    fn test_partial_deposit_keeps_overflow_on_ship() {
        let mut registry = EntityRegistry::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        let depot = registry.register(Entity::target(Team::Red, Vec2::new(30.0, 0.0)));
        registry.get_mut(ship).unwrap().as_ship_mut().unwrap().crystals_carried = 5;
        registry.get_mut(depot).unwrap().as_target_mut().unwrap().crystals_stored = 18;

        let receipt = deposit(&mut registry, ship, depot, 50.0).unwrap();
        assert_eq!(receipt.accepted, 2);
        assert_eq!(receipt.rejected(), 3);
        assert_eq!(carried(&registry, ship), 3);
        assert_eq!(registry.get(depot).unwrap().as_target().unwrap().crystals_stored, 20);
    }

    #[test]
    fn test_deposit_requires_same_team_in_range() {
        let mut registry = EntityRegistry::new();
        let ship = ship_at(&mut registry, Team::Red, Vec2::ZERO);
        let enemy = registry.register(Entity::target(Team::Blue, Vec2::new(10.0, 0.0)));
        let distant = registry.register(Entity::target(Team::Red, Vec2::new(50.01, 0.0)));
        let edge = registry.register(Entity::target(Team::Red, Vec2::new(0.0, 50.0)));
        registry.get_mut(ship).unwrap().as_ship_mut().unwrap().crystals_carried = 4;

        run_deposits(&mut registry, 50.0);
        assert_eq!(carried(&registry, ship), 0);
        assert_eq!(registry.get(enemy).unwrap().as_target().unwrap().crystals_stored, 0);
        assert_eq!(registry.get(distant).unwrap().as_target().unwrap().crystals_stored, 0);
        assert_eq!(registry.get(edge).unwrap().as_target().unwrap().crystals_stored, 4);
    }
}
