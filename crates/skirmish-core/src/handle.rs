//! Stable, generation-tagged entity handles.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Opaque reference to a registry slot.
///
/// The packed value carries both the slot index and a generation counter, so
/// a handle that outlives its entity is detected as stale instead of
/// silently aliasing whatever reuses the slot later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityHandle(NonZeroU64);

impl EntityHandle {
    /// Rebuild a handle from its packed representation.
    pub fn from_bits(bits: NonZeroU64) -> Self {
        Self(bits)
    }

    /// Packed representation, suitable for storage in external collaborators.
    pub fn to_bits(self) -> NonZeroU64 {
        self.0
    }
}

impl std::fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}
