//! Systems that operate on the entity registry each tick.
//!
//! Systems are free functions over `&mut EntityRegistry` (or `&EntityRegistry`
//! for read-only work). They hold no state of their own; everything lives in
//! the entities, the team model, or the selection controller.

pub mod cleanup;
pub mod combat;
pub mod projectile;
pub mod selection;
pub mod ship;
pub mod snapshot;
pub mod targeting;
pub mod visibility;
