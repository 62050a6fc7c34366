//! Recoverable simulation errors.
//!
//! None of these are fatal. Controllers return them so callers can tell why
//! nothing happened; the tick driver logs and absorbs them within the tick
//! that produced them.

use crate::enums::UnitKind;
use crate::handle::EntityHandle;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// The handle refers to an entity that was destroyed or never existed.
    #[error("entity {0} no longer exists")]
    StaleHandle(EntityHandle),

    /// A ship hotkey pointed past the end of the ship list.
    #[error("no ship at index {index} ({ships} ships alive)")]
    InvalidSelectionIndex { index: usize, ships: usize },

    /// The entity exists but cannot be selected.
    #[error("{0:?} entities cannot be selected")]
    NotSelectable(UnitKind),

    /// Only crystals may be filed under Spectator.
    #[error("{0:?} units cannot belong to Spectator")]
    SpectatorOwned(UnitKind),

    /// A search for a target came back empty.
    #[error("no eligible target")]
    NoEligibleTarget,
}
