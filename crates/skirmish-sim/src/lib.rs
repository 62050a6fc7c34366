//! Simulation engine for SKIRMISH.
//!
//! Owns the entity registry, runs systems in a fixed phase order each tick,
//! and produces ArenaSnapshots for render and UI collaborators.

pub mod engine;
pub mod events;
pub mod registry;
pub mod scenario;
pub mod systems;
pub mod teams;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use skirmish_core as core;
