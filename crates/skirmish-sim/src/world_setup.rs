//! Entity factories and the default arena layout.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::constants::{CRYSTAL_MAX_UNITS, CRYSTAL_MIN_UNITS};
use skirmish_core::entity::Entity;
use skirmish_core::enums::{Team, UnitKind};
use skirmish_core::error::SimError;

use crate::engine::SimConfig;
use crate::registry::EntityRegistry;

/// Horizontal distance of each team's base from the arena centre.
const BASE_OFFSET: f32 = 700.0;

/// Neutral crystal fields, mirrored around the centre line.
const CRYSTAL_FIELDS: [Vec2; 7] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, -260.0),
    Vec2::new(0.0, 260.0),
    Vec2::new(-320.0, -140.0),
    Vec2::new(-320.0, 140.0),
    Vec2::new(320.0, -140.0),
    Vec2::new(320.0, 140.0),
];

/// Check a spawn request and fill in anything it left for the simulation to
/// decide. Every entity passes through here before it is registered.
///
/// Units other than crystals must belong to a playing team. Hit points are
/// clamped to the maximum, and crystal deposits with no units get a random
/// size.
pub fn prepare(entity: &mut Entity, rng: &mut ChaCha8Rng) -> Result<(), SimError> {
    let kind = entity.unit_kind();
    if kind != UnitKind::Crystal && entity.team.is_spectator() {
        return Err(SimError::SpectatorOwned(kind));
    }
    entity.health.current = entity.health.current.min(entity.health.max);
    size_crystal(entity, rng);
    Ok(())
}

fn size_crystal(entity: &mut Entity, rng: &mut ChaCha8Rng) {
    if let Some(crystal) = entity.as_crystal_mut() {
        if crystal.remaining_units == 0 {
            crystal.remaining_units = rng.gen_range(CRYSTAL_MIN_UNITS..=CRYSTAL_MAX_UNITS);
        }
    }
}

/// A ship configured for this run.
pub fn ship(team: Team, position: Vec2, config: &SimConfig) -> Entity {
    let mut entity = Entity::ship(team, position);
    if let Some(ship) = entity.as_ship_mut() {
        ship.crystal_capacity = config.ship_crystal_capacity;
    }
    entity
}

/// Spawn the default two-team arena: per team two ships, a turret guarding a
/// depot, plus neutral crystal fields in between. Red is registered first,
/// so Red's lead ship is ship 0.
pub fn setup_arena(registry: &mut EntityRegistry, rng: &mut ChaCha8Rng, config: &SimConfig) {
    for (team, side) in [(Team::Red, -1.0), (Team::Blue, 1.0)] {
        spawn_base(registry, team, side, config);
    }
    for position in CRYSTAL_FIELDS {
        let mut crystal = Entity::crystal(position, 0);
        size_crystal(&mut crystal, rng);
        registry.register(crystal);
    }
}

fn spawn_base(registry: &mut EntityRegistry, team: Team, side: f32, config: &SimConfig) {
    let base = Vec2::new(side * BASE_OFFSET, 0.0);
    // Ships face the centre of the arena.
    let facing = if side < 0.0 { 0.0 } else { std::f32::consts::PI };

    for y in [-60.0, 60.0] {
        let position = base + Vec2::new(-side * 100.0, y);
        registry.register(ship(team, position, config).with_rotation(facing));
    }
    registry.register(Entity::turret(team, base + Vec2::new(-side * 180.0, 0.0)));
    registry.register(Entity::target(team, base + Vec2::new(side * 60.0, 0.0)));
}
