//! Per-team state: crystal totals and the set of entities each team can see.

use std::collections::BTreeSet;

use skirmish_core::enums::Team;
use skirmish_core::handle::EntityHandle;

/// One team's running state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamState {
    pub crystals_total: f32,
    visible: BTreeSet<EntityHandle>,
}

impl TeamState {
    pub fn visible_set(&self) -> &BTreeSet<EntityHandle> {
        &self.visible
    }
}

/// Freshly computed visible sets for every team, swapped in as a unit.
#[derive(Debug, Clone, Default)]
pub struct VisibleSets {
    pub red: BTreeSet<EntityHandle>,
    pub blue: BTreeSet<EntityHandle>,
    pub spectator: BTreeSet<EntityHandle>,
}

impl VisibleSets {
    pub fn get_mut(&mut self, team: Team) -> &mut BTreeSet<EntityHandle> {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
            Team::Spectator => &mut self.spectator,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamModel {
    red: TeamState,
    blue: TeamState,
    spectator: TeamState,
}

impl TeamModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, team: Team) -> &TeamState {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
            Team::Spectator => &self.spectator,
        }
    }

    fn state_mut(&mut self, team: Team) -> &mut TeamState {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
            Team::Spectator => &mut self.spectator,
        }
    }

    pub fn crystals_total(&self, team: Team) -> f32 {
        self.state(team).crystals_total
    }

    /// Credit mined crystals to a team. Spectator never accrues and
    /// non-positive amounts are ignored. Returns whether the total changed.
    pub fn add_crystals(&mut self, team: Team, amount: f32) -> bool {
        if team.is_spectator() || amount <= 0.0 {
            return false;
        }
        self.state_mut(team).crystals_total += amount;
        true
    }

    pub fn is_visible(&self, handle: EntityHandle, team: Team) -> bool {
        self.state(team).visible.contains(&handle)
    }

    pub fn visible_set(&self, team: Team) -> &BTreeSet<EntityHandle> {
        &self.state(team).visible
    }

    /// Replace every team's visible set at once.
    pub fn replace_visibility(&mut self, sets: VisibleSets) {
        self.red.visible = sets.red;
        self.blue.visible = sets.blue;
        self.spectator.visible = sets.spectator;
    }

    /// Drop a destroyed entity from every visible set.
    pub fn forget(&mut self, handle: EntityHandle) {
        for team in Team::ALL {
            self.state_mut(team).visible.remove(&handle);
        }
    }
}
