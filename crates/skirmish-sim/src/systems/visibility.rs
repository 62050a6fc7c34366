//! Fog-of-war system: recomputes what every team can see.
//!
//! Runs after combat so that entities destroyed this tick are already gone
//! from the registry and cannot appear in any visible set.
//!
//! For a playing team T an entity is visible when it belongs to T, or when
//! some seer of T has it within its visibility range (inclusive). A team
//! with no seers sees nothing foreign. Spectator sees everything.

use glam::Vec2;

use skirmish_core::enums::Team;
use skirmish_core::handle::EntityHandle;
use skirmish_core::types::Disc;

use crate::registry::EntityRegistry;
use crate::teams::{TeamModel, VisibleSets};

/// Lit discs of every alive seer on `team`, in registration order.
///
/// Spectator owns no seers, so its list is always empty.
pub fn seer_discs(registry: &EntityRegistry, team: Team) -> Vec<Disc> {
    if team.is_spectator() {
        return Vec::new();
    }
    registry.scan(|_, entity| {
        if entity.team != team {
            return None;
        }
        let seer = entity.kind.as_seer()?;
        Some(Disc::new(entity.position, seer.visibility_range()))
    })
}

/// Compute fresh visible sets for all teams.
pub fn compute(registry: &EntityRegistry) -> VisibleSets {
    let targets: Vec<(EntityHandle, Option<Team>, Vec2)> =
        registry.scan(|handle, entity| Some((handle, entity.owner(), entity.position)));

    let mut sets = VisibleSets::default();
    for team in Team::PLAYING {
        let discs = seer_discs(registry, team);
        let visible = sets.get_mut(team);
        for (handle, owner, position) in &targets {
            if *owner == Some(team) || discs.iter().any(|disc| disc.contains(*position)) {
                visible.insert(*handle);
            }
        }
    }
    sets.spectator = targets.iter().map(|(handle, _, _)| *handle).collect();
    sets
}

/// Recompute and swap in every team's visible set.
pub fn run(registry: &EntityRegistry, teams: &mut TeamModel) {
    teams.replace_visibility(compute(registry));
}

#[cfg(test)]
mod tests {
    use skirmish_core::entity::Entity;

    use super::*;

    #[test]
    fn test_own_team_always_visible() {
        let mut registry = EntityRegistry::new();
        // A target far from any friendly seer radius except its own.
        let far = registry.register(Entity::target(Team::Red, Vec2::new(10_000.0, 0.0)));
        let ship = registry.register(Entity::ship(Team::Red, Vec2::ZERO));

        let sets = compute(&registry);
        assert!(sets.red.contains(&far));
        assert!(sets.red.contains(&ship));
    }

    #[test]
    fn test_range_boundary_is_inclusive() {
        let mut registry = EntityRegistry::new();
        registry.register(Entity::ship(Team::Red, Vec2::ZERO));
        let on_rim = registry.register(Entity::crystal(Vec2::new(500.0, 0.0), 10));
        let past_rim = registry.register(Entity::crystal(Vec2::new(500.01, 0.0), 10));

        let sets = compute(&registry);
        assert!(sets.red.contains(&on_rim));
        assert!(!sets.red.contains(&past_rim));
    }

    #[test]
    fn test_no_seers_fails_closed() {
        let mut registry = EntityRegistry::new();
        let red_ship = registry.register(Entity::ship(Team::Red, Vec2::ZERO));
        let crystal = registry.register(Entity::crystal(Vec2::new(1.0, 0.0), 10));

        let sets = compute(&registry);
        assert!(sets.blue.is_empty());
        assert!(!sets.blue.contains(&red_ship));
        assert!(!sets.blue.contains(&crystal));
    }

    #[test]
    fn test_projectiles_do_not_see() {
        let mut registry = EntityRegistry::new();
        registry.register(Entity::projectile(Team::Blue, Vec2::ZERO, Vec2::X));
        let red = registry.register(Entity::ship(Team::Red, Vec2::new(5.0, 0.0)));

        assert!(seer_discs(&registry, Team::Blue).is_empty());
        assert!(!compute(&registry).blue.contains(&red));
    }

    #[test]
    fn test_spectator_sees_everything() {
        let mut registry = EntityRegistry::new();
        let handles = [
            registry.register(Entity::ship(Team::Red, Vec2::ZERO)),
            registry.register(Entity::turret(Team::Blue, Vec2::new(9000.0, 0.0))),
            registry.register(Entity::crystal(Vec2::new(-9000.0, 0.0), 10)),
        ];
        let sets = compute(&registry);
        for handle in handles {
            assert!(sets.spectator.contains(&handle));
        }
        assert!(seer_discs(&registry, Team::Spectator).is_empty());
    }
}
