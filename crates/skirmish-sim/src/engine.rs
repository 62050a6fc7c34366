//! Simulation engine and tick driver.
//!
//! `SimulationEngine` owns the entity registry, the team model and the
//! selection state, processes queued commands, runs every system in a fixed
//! phase order, and produces an `ArenaSnapshot` per tick. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use skirmish_core::commands::{PlayerCommand, WorldCommand};
use skirmish_core::constants::*;
use skirmish_core::entity::Entity;
use skirmish_core::enums::{ControlLossPolicy, Team};
use skirmish_core::error::SimError;
use skirmish_core::events::{WorldEvent, WorldEvents};
use skirmish_core::handle::EntityHandle;
use skirmish_core::state::ArenaSnapshot;
use skirmish_core::types::SimTime;

use crate::events::TracingEvents;
use crate::registry::EntityRegistry;
use crate::systems;
use crate::systems::selection::SelectionController;
use crate::systems::ship::PilotInput;
use crate::teams::TeamModel;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per simulated second.
    pub tick_rate: u32,
    /// Maximum distance between a click and the entity it picks.
    pub pick_radius: f32,
    /// Maximum distance between a ship and a depot it unloads into.
    pub deposit_range: f32,
    /// Distance at which a waypoint counts as reached.
    pub arrival_distance: f32,
    /// Seconds of continuous beam contact per mined unit.
    pub mining_dwell_secs: f32,
    pub ship_crystal_capacity: u32,
    pub projectile_damage: i32,
    /// What happens to control when the controlled ship is destroyed.
    pub control_loss: ControlLossPolicy,
    /// Select and control the first registered ship on the first tick.
    pub initial_selection: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
            pick_radius: PICK_RADIUS,
            deposit_range: DEPOSIT_RANGE,
            arrival_distance: ARRIVAL_DISTANCE,
            mining_dwell_secs: MINING_DWELL_SECS,
            ship_crystal_capacity: SHIP_CRYSTAL_CAPACITY,
            projectile_damage: PROJECTILE_DAMAGE,
            control_loss: ControlLossPolicy::default(),
            initial_selection: true,
        }
    }
}

impl SimConfig {
    /// Seconds per tick.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Whole ticks of beam contact needed per mined unit (at least one).
    pub fn dwell_ticks_per_unit(&self) -> u32 {
        (self.mining_dwell_secs * self.tick_rate as f32).round().max(1.0) as u32
    }
}

/// The simulation engine. Owns the registry and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    registry: EntityRegistry,
    teams: TeamModel,
    selection: SelectionController,
    input: PilotInput,
    time: SimTime,
    rng: ChaCha8Rng,
    started: bool,
    command_queue: VecDeque<PlayerCommand>,
    world_queue: VecDeque<WorldCommand>,
    despawn_buffer: Vec<EntityHandle>,
    /// Projectiles fired this tick, registered after death resolution.
    spawn_buffer: Vec<Entity>,
    tick_events: Vec<WorldEvent>,
    sink: Box<dyn WorldEvents>,
}

impl SimulationEngine {
    /// Create an engine that logs world events through `tracing`.
    pub fn new(config: SimConfig) -> Self {
        Self::with_events(config, Box::new(TracingEvents))
    }

    /// Create an engine that hands world events to `sink`.
    pub fn with_events(config: SimConfig, sink: Box<dyn WorldEvents>) -> Self {
        Self {
            registry: EntityRegistry::new(),
            teams: TeamModel::new(),
            selection: SelectionController::new(config.control_loss, config.pick_radius),
            input: PilotInput::default(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            started: false,
            command_queue: VecDeque::new(),
            world_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            spawn_buffer: Vec::new(),
            tick_events: Vec::new(),
            sink,
            config,
        }
    }

    /// Spawn the default arena. Call before the first tick.
    pub fn setup_arena(&mut self) {
        world_setup::setup_arena(&mut self.registry, &mut self.rng, &self.config);
    }

    /// Register an entity immediately. Only valid between ticks.
    pub fn spawn(&mut self, mut entity: Entity) -> Result<EntityHandle, SimError> {
        world_setup::prepare(&mut entity, &mut self.rng)?;
        Ok(self.registry.register(entity))
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Queue a spawn or destroy request for the next cleanup phase.
    pub fn queue_world_command(&mut self, command: WorldCommand) {
        self.world_queue.push_back(command);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> ArenaSnapshot {
        self.run_systems();
        self.time.advance(self.config.dt());

        let events = std::mem::take(&mut self.tick_events);
        for event in &events {
            self.sink.emit(event);
        }

        systems::snapshot::build_snapshot(
            &self.registry,
            &self.teams,
            &self.selection,
            &self.time,
            events,
        )
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the entity registry.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn teams(&self) -> &TeamModel {
        &self.teams
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn pilot_input(&self) -> PilotInput {
        self.input
    }

    /// Team whose fog the player currently looks through.
    pub fn viewing_team(&self) -> Team {
        self.selection.viewing_team(&self.registry)
    }

    /// Whether `team` saw `handle` as of the last tick.
    pub fn is_visible(&self, handle: EntityHandle, team: Team) -> bool {
        self.teams.is_visible(handle, team)
    }

    pub fn crystals_total(&self, team: Team) -> f32 {
        self.teams.crystals_total(team)
    }

    /// Mutable registry access for tests that need to force entity state.
    #[cfg(test)]
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Process all queued player commands, after noticing a lost controlled
    /// ship.
    fn process_commands(&mut self) {
        if let Some(heir) = self
            .selection
            .validate(&mut self.registry, &mut self.tick_events)
        {
            info!(ship = %heir, "control handed to fallback ship");
        }

        if !self.started {
            self.started = true;
            if self.config.initial_selection && self.selection.controlled().is_none() {
                if let Err(err) =
                    self.selection
                        .select_index(&mut self.registry, 0, &mut self.tick_events)
                {
                    debug!(%err, "no ship for initial selection");
                }
            }
        }

        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                debug!(%err, "player command ignored");
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), SimError> {
        match command {
            PlayerCommand::SelectIndex { index } => {
                self.selection
                    .select_index(&mut self.registry, index, &mut self.tick_events)?;
            }
            PlayerCommand::PointerClick { position } => {
                self.selection
                    .pointer_select(&mut self.registry, position, &mut self.tick_events)?;
            }
            PlayerCommand::SetWaypoint { position } => self.set_waypoint(position)?,
            PlayerCommand::SetFireHeld { held } => self.input.fire_held = held,
            PlayerCommand::SetMineHeld { held } => self.input.mine_held = held,
        }
        Ok(())
    }

    fn set_waypoint(&mut self, position: Vec2) -> Result<(), SimError> {
        let handle = self.selection.controlled().ok_or(SimError::NoEligibleTarget)?;
        let ship = self
            .registry
            .get_mut(handle)
            .and_then(Entity::as_ship_mut)
            .ok_or(SimError::StaleHandle(handle))?;
        ship.waypoint = Some(position);
        Ok(())
    }

    /// Run all systems in phase order.
    fn run_systems(&mut self) {
        let dt = self.config.dt();
        let damage = self.config.projectile_damage;

        // 1. Cleanup (world commands, leftover dead)
        systems::cleanup::run(
            &mut self.registry,
            &mut self.teams,
            self.world_queue.drain(..),
            &mut self.rng,
            &mut self.despawn_buffer,
        );
        // 2. Input and selection
        self.process_commands();
        let controlled = self.selection.controlled();
        // 3. Movement and abilities
        systems::ship::run_movement(&mut self.registry, dt, self.config.arrival_distance);
        systems::projectile::run(&mut self.registry, dt);
        systems::targeting::run(&mut self.registry, dt, damage, &mut self.spawn_buffer);
        systems::ship::run_weapons(
            &mut self.registry,
            controlled,
            self.input,
            dt,
            damage,
            &mut self.spawn_buffer,
        );
        systems::ship::run_mining(
            &mut self.registry,
            &mut self.teams,
            controlled,
            self.input,
            self.config.dwell_ticks_per_unit(),
        );
        systems::ship::run_deposits(&mut self.registry, self.config.deposit_range);
        // 4. Damage and death
        systems::combat::resolve_hits(&mut self.registry, &mut self.tick_events);
        let removed = systems::combat::resolve_deaths(&mut self.registry, &mut self.teams);
        if !removed.is_empty() {
            debug!(count = removed.len(), tick = self.time.tick, "entities destroyed");
        }
        for entity in self.spawn_buffer.drain(..) {
            self.registry.register(entity);
        }
        // 5. Visibility
        systems::visibility::run(&self.registry, &mut self.teams);
    }
}
