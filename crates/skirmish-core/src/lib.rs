//! Core types and definitions for the SKIRMISH arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! the tagged entity model, capability traits, commands, world events,
//! per-tick snapshot views, and constants. It has no dependency on the
//! ECS or on any runtime framework.

pub mod capability;
pub mod commands;
pub mod constants;
pub mod entity;
pub mod enums;
pub mod error;
pub mod events;
pub mod handle;
pub mod state;
pub mod types;
