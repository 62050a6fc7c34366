//! Projectile flight: straight-line integration and range bookkeeping.

use crate::registry::EntityRegistry;

/// Advance every projectile by one tick. Spent projectiles are left in place
/// for death resolution to remove.
pub fn run(registry: &mut EntityRegistry, dt: f32) {
    registry.for_each_mut(|_, entity| {
        let position = entity.position;
        let Some(shot) = entity.as_projectile_mut() else {
            return;
        };
        let step = shot.speed * dt;
        let direction = shot.direction;
        shot.traveled_distance += step;
        entity.position = position + direction * step;
    });
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use skirmish_core::constants::DT;
    use skirmish_core::entity::Entity;
    use skirmish_core::enums::Team;

    use super::*;

    #[test]
    fn test_projectile_flies_until_spent() {
        let mut registry = EntityRegistry::new();
        let shot = registry.register(Entity::projectile(Team::Red, Vec2::ZERO, Vec2::Y));
        let ship = registry.register(Entity::ship(Team::Blue, Vec2::ZERO));

        run(&mut registry, DT);
        let entity = registry.get(shot).unwrap();
        assert!((entity.position.y - 700.0 / 60.0).abs() < 1e-3);
        assert!(!entity.is_dead());
        drop(entity);

        // 700 units at 700 u/s is one second of flight.
        for _ in 0..60 {
            run(&mut registry, DT);
        }
        assert!(registry.get(shot).unwrap().is_dead());
        assert_eq!(registry.get(ship).unwrap().position, Vec2::ZERO);
    }
}
