//! Turret targeting system.
//!
//! Every tick each turret rescans for the nearest enemy ship inside its
//! detection range and fires at it when its cooldown has elapsed. There is
//! no lock memory beyond the phase bookkeeping: a target that dies or leaves
//! range is simply replaced by the next rescan, with no cooldown penalty.

use glam::Vec2;

use skirmish_core::constants::TIMER_EPSILON;
use skirmish_core::entity::Entity;
use skirmish_core::enums::{Team, TurretPhase};
use skirmish_core::handle::EntityHandle;

use crate::registry::EntityRegistry;

/// A ship a turret could shoot at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub handle: EntityHandle,
    pub team: Team,
    pub position: Vec2,
}

/// All alive ships, in registration order.
pub fn ship_contacts(registry: &EntityRegistry) -> Vec<Contact> {
    registry.scan(|handle, entity| {
        entity.as_ship().map(|_| Contact {
            handle,
            team: entity.team,
            position: entity.position,
        })
    })
}

/// Nearest contact not on `team` within `range` of `origin` (inclusive).
///
/// `contacts` must be in registration order: on equal distance the earlier
/// contact wins.
pub fn nearest_enemy(contacts: &[Contact], team: Team, origin: Vec2, range: f32) -> Option<Contact> {
    let mut best: Option<(f32, Contact)> = None;
    for contact in contacts.iter().filter(|c| c.team != team) {
        let distance = origin.distance(contact.position);
        if distance > range {
            continue;
        }
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, *contact));
        }
    }
    best.map(|(_, contact)| contact)
}

/// Advance every turret by one tick. New projectiles are appended to
/// `spawns` and registered later in the tick.
pub fn run(registry: &mut EntityRegistry, dt: f32, damage: i32, spawns: &mut Vec<Entity>) {
    let contacts = ship_contacts(registry);
    let turrets = registry.for_each_alive(|e| e.as_turret().is_some());

    for handle in turrets.iter() {
        let Some(entity) = registry.get_mut(handle) else {
            continue;
        };
        let team = entity.team;
        let origin = entity.position;
        let Some(turret) = entity.as_turret_mut() else {
            continue;
        };

        turret.time_since_last_shot += dt;

        let target = nearest_enemy(&contacts, team, origin, turret.detection_range);
        turret.phase = match (target, turret.current_target) {
            (None, _) => TurretPhase::Idle,
            (Some(t), Some(previous)) if t.handle == previous => TurretPhase::Engaging,
            (Some(_), _) => TurretPhase::Acquiring,
        };
        turret.current_target = target.map(|t| t.handle);

        let Some(target) = target else {
            continue;
        };
        if turret.fire_rate <= 0.0
            || turret.time_since_last_shot + TIMER_EPSILON < 1.0 / turret.fire_rate
        {
            continue;
        }
        // A ship sitting exactly on the turret gives no direction to shoot in.
        let Some(direction) = (target.position - origin).try_normalize() else {
            continue;
        };
        turret.time_since_last_shot = 0.0;

        let mut projectile = Entity::projectile(team, origin, direction);
        if let Some(shot) = projectile.as_projectile_mut() {
            shot.damage = damage;
        }
        spawns.push(projectile);
    }
}
