//! Selection and control.
//!
//! At most one entity is selected and at most one ship is controlled at any
//! time. Every successful selection first clears the flags on all entities,
//! so stale flags cannot survive a change of selection. When the controlled
//! ship dies, the next input phase notices and applies the configured
//! [`ControlLossPolicy`].

use glam::Vec2;
use tracing::debug;

use skirmish_core::enums::{ControlLossPolicy, Team};
use skirmish_core::error::SimError;
use skirmish_core::events::WorldEvent;
use skirmish_core::handle::EntityHandle;

use crate::registry::EntityRegistry;

#[derive(Debug, Clone)]
pub struct SelectionController {
    policy: ControlLossPolicy,
    pick_radius: f32,
    selected: Option<EntityHandle>,
    /// Controlled ship and the team it flew for, kept so the team is still
    /// known after the ship is gone.
    controlled: Option<(EntityHandle, Team)>,
}

impl SelectionController {
    pub fn new(policy: ControlLossPolicy, pick_radius: f32) -> Self {
        Self {
            policy,
            pick_radius,
            selected: None,
            controlled: None,
        }
    }

    pub fn selected(&self) -> Option<EntityHandle> {
        self.selected
    }

    pub fn controlled(&self) -> Option<EntityHandle> {
        self.controlled.map(|(handle, _)| handle)
    }

    pub fn policy(&self) -> ControlLossPolicy {
        self.policy
    }

    /// Team whose fog the player looks through: the controlled ship's team,
    /// or Spectator when nothing is controlled.
    pub fn viewing_team(&self, registry: &EntityRegistry) -> Team {
        self.controlled
            .filter(|(handle, _)| registry.contains(*handle))
            .map_or(Team::Spectator, |(_, team)| team)
    }

    /// Select and control the ship at `index` among alive ships in
    /// registration order.
    pub fn select_index(
        &mut self,
        registry: &mut EntityRegistry,
        index: usize,
        events: &mut Vec<WorldEvent>,
    ) -> Result<EntityHandle, SimError> {
        let ships = registry.for_each_alive(|e| e.as_ship().is_some());
        let handle = ships.get(index).ok_or(SimError::InvalidSelectionIndex {
            index,
            ships: ships.len(),
        })?;
        self.select(registry, handle, events)
    }

    /// Pick the selectable entity nearest to `point` within the pick radius.
    ///
    /// A click on empty space clears the selection and reports
    /// [`SimError::NoEligibleTarget`].
    pub fn pointer_select(
        &mut self,
        registry: &mut EntityRegistry,
        point: Vec2,
        events: &mut Vec<WorldEvent>,
    ) -> Result<EntityHandle, SimError> {
        let candidates = registry.scan(|handle, entity| {
            entity.kind.as_targetable()?;
            let distance = entity.position.distance(point);
            (distance <= self.pick_radius).then_some((distance, handle))
        });

        let mut nearest: Option<(f32, EntityHandle)> = None;
        for candidate in candidates {
            if nearest.is_none_or(|(best, _)| candidate.0 < best) {
                nearest = Some(candidate);
            }
        }

        match nearest {
            Some((_, handle)) => self.select(registry, handle, events),
            None => {
                self.clear(registry);
                Err(SimError::NoEligibleTarget)
            }
        }
    }

    /// Make `handle` the only selected entity. Ships also become controlled
    /// and request a camera recentre.
    pub fn select(
        &mut self,
        registry: &mut EntityRegistry,
        handle: EntityHandle,
        events: &mut Vec<WorldEvent>,
    ) -> Result<EntityHandle, SimError> {
        let (team, position, controllable) = {
            let entity = registry.get(handle).ok_or(SimError::StaleHandle(handle))?;
            let targetable = entity
                .kind
                .as_targetable()
                .ok_or(SimError::NotSelectable(entity.unit_kind()))?;
            (entity.team, entity.position, targetable.controllable())
        };

        self.clear(registry);
        let Some(entity) = registry.get_mut(handle) else {
            return Err(SimError::StaleHandle(handle));
        };
        entity.selection.selected = true;
        entity.selection.controlled = controllable;
        self.selected = Some(handle);

        if controllable {
            self.controlled = Some((handle, team));
            events.push(WorldEvent::RecenterCamera { position });
        }
        debug!(%handle, %team, controllable, "selection changed");
        Ok(handle)
    }

    /// Drop every selection and control flag.
    pub fn clear(&mut self, registry: &mut EntityRegistry) {
        registry.for_each_mut(|_, entity| entity.selection.clear());
        self.selected = None;
        self.controlled = None;
    }

    /// Forget a selected entity that no longer exists and apply the control
    /// loss policy if the controlled ship is gone. Returns the newly
    /// controlled ship, if control was handed over.
    pub fn validate(
        &mut self,
        registry: &mut EntityRegistry,
        events: &mut Vec<WorldEvent>,
    ) -> Option<EntityHandle> {
        if self.selected.is_some_and(|handle| !registry.contains(handle)) {
            self.selected = None;
        }

        let (lost, team) = self.controlled?;
        if registry.contains(lost) {
            return None;
        }
        self.controlled = None;
        debug!(ship = %lost, %team, policy = ?self.policy, "controlled ship lost");

        match self.policy {
            ControlLossPolicy::Clear => None,
            ControlLossPolicy::FallbackToFirstTeamShip => {
                let heir = registry
                    .for_each_alive(|e| e.team == team && e.as_ship().is_some())
                    .first()?;
                self.select(registry, heir, events).ok()
            }
        }
    }
}
