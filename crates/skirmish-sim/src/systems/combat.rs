//! Damage and death resolution.
//!
//! Projectile contact is a radius test against foreign damageable entities.
//! A hit consumes the projectile, removes hit points, and requests an
//! explosion at the point of impact. Death resolution then removes
//! everything whose kind-specific death condition holds.

use glam::Vec2;
use tracing::debug;

use skirmish_core::enums::Team;
use skirmish_core::events::WorldEvent;
use skirmish_core::handle::EntityHandle;

use crate::registry::EntityRegistry;
use crate::teams::TeamModel;

struct Body {
    handle: EntityHandle,
    team: Team,
    position: Vec2,
    radius: f32,
}

/// Apply projectile contacts. Each projectile hits at most one body: the
/// nearest foreign one whose hit radius contains it, earliest registered on
/// a tie.
pub fn resolve_hits(registry: &mut EntityRegistry, events: &mut Vec<WorldEvent>) {
    let projectiles = registry.for_each_alive(|e| e.as_projectile().is_some());
    let bodies: Vec<Body> = registry.scan(|handle, entity| {
        let damageable = entity.kind.as_damageable()?;
        Some(Body {
            handle,
            team: entity.team,
            position: entity.position,
            radius: damageable.hit_radius(),
        })
    });

    for shot in projectiles.iter() {
        let Some((team, position, damage)) = registry
            .get(shot)
            .and_then(|e| Some((e.team, e.position, e.as_projectile()?.damage)))
        else {
            continue;
        };

        let mut nearest: Option<(f32, EntityHandle)> = None;
        for body in bodies.iter().filter(|b| b.team != team) {
            let distance = body.position.distance(position);
            if distance > body.radius {
                continue;
            }
            // Bodies already destroyed by an earlier shot this tick absorb
            // nothing further.
            let alive = registry
                .get(body.handle)
                .is_some_and(|e| !e.health.is_destroyed());
            if alive && nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, body.handle));
            }
        }
        let Some((_, victim)) = nearest else {
            continue;
        };

        if let Some(entity) = registry.get_mut(victim) {
            let destroyed = entity.health.apply_damage(damage);
            debug!(%victim, %shot, hp = entity.health.current, destroyed, "projectile hit");
        }
        registry.destroy(shot);
        events.push(WorldEvent::Explosion { position });
    }
}

/// Remove every dead entity: destroyed hit points, spent projectiles and
/// depleted crystals. Returns the removed handles in registration order.
pub fn resolve_deaths(registry: &mut EntityRegistry, teams: &mut TeamModel) -> Vec<EntityHandle> {
    let dead = registry.for_each_alive(|e| e.is_dead());
    let mut removed = Vec::with_capacity(dead.len());
    for handle in dead {
        if registry.destroy(handle).is_some() {
            teams.forget(handle);
            removed.push(handle);
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use skirmish_core::entity::Entity;

    use super::*;

    #[test]
    fn test_hit_damages_foreign_body_and_explodes() {
        let mut registry = EntityRegistry::new();
        let turret = registry.register(Entity::turret(Team::Blue, Vec2::ZERO));
        let shot = registry.register(Entity::projectile(Team::Red, Vec2::new(15.0, 0.0), Vec2::NEG_X));

        let mut events = Vec::new();
        resolve_hits(&mut registry, &mut events);

        assert!(!registry.contains(shot));
        assert_eq!(registry.get(turret).unwrap().health.current, 4);
        assert_eq!(
            events,
            vec![WorldEvent::Explosion {
                position: Vec2::new(15.0, 0.0)
            }]
        );
    }

    #[test]
    fn test_friendly_projectiles_pass_through() {
        let mut registry = EntityRegistry::new();
        let ship = registry.register(Entity::ship(Team::Red, Vec2::ZERO));
        let shot = registry.register(Entity::projectile(Team::Red, Vec2::ZERO, Vec2::X));

        let mut events = Vec::new();
        resolve_hits(&mut registry, &mut events);
        assert!(registry.contains(shot));
        assert_eq!(registry.get(ship).unwrap().health.current, 3);
        assert!(events.is_empty());
    }

    #[test]
    fn test_hit_radius_boundary() {
        let mut registry = EntityRegistry::new();
        registry.register(Entity::ship(Team::Blue, Vec2::ZERO));
        let grazing = registry.register(Entity::projectile(Team::Red, Vec2::new(16.0, 0.0), Vec2::X));
        let wide = registry.register(Entity::projectile(Team::Red, Vec2::new(0.0, 16.5), Vec2::X));

        let mut events = Vec::new();
        resolve_hits(&mut registry, &mut events);
        assert!(!registry.contains(grazing));
        assert!(registry.contains(wide));
    }

    #[test]
    fn test_deaths_removed_in_same_pass() {
        let mut registry = EntityRegistry::new();
        let mut teams = TeamModel::new();
        let target = registry.register(Entity::target(Team::Blue, Vec2::ZERO));
        let crystal = registry.register(Entity::crystal(Vec2::new(300.0, 0.0), 0));
        let ship = registry.register(Entity::ship(Team::Red, Vec2::new(-300.0, 0.0)));
        registry.register(Entity::projectile(Team::Red, Vec2::new(5.0, 0.0), Vec2::X));

        let mut events = Vec::new();
        resolve_hits(&mut registry, &mut events);
        let removed = resolve_deaths(&mut registry, &mut teams);

        assert_eq!(removed, vec![target, crystal]);
        assert!(!registry.contains(target));
        assert!(registry.contains(ship));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_overkill_shots_are_not_consumed() {
        let mut registry = EntityRegistry::new();
        let target = registry.register(Entity::target(Team::Blue, Vec2::ZERO));
        let first = registry.register(Entity::projectile(Team::Red, Vec2::ZERO, Vec2::X));
        let second = registry.register(Entity::projectile(Team::Red, Vec2::ZERO, Vec2::X));

        let mut events = Vec::new();
        resolve_hits(&mut registry, &mut events);
        assert!(registry.get(target).unwrap().health.is_destroyed());
        assert!(!registry.contains(first));
        assert!(registry.contains(second));
        assert_eq!(events.len(), 1);
    }
}
