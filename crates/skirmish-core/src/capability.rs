//! Capability traits implemented per entity kind.
//!
//! Systems never inspect an entity's concrete kind to decide what it can
//! do. They ask the kind for a capability through
//! [`EntityKind::as_seer`](crate::entity::EntityKind::as_seer) and friends,
//! which dispatch with a `match`.

/// Contributes a lit disc to its team's fog-of-war.
pub trait Seer {
    fn visibility_range(&self) -> f32;
}

/// Can be hit by projectiles and lose hit points.
pub trait Damageable {
    /// Contact radius for projectile hits.
    fn hit_radius(&self) -> f32;
}

/// Can be picked with the pointer and become the selected entity.
pub trait Targetable {
    /// Whether selecting this entity also hands it human control.
    fn controllable(&self) -> bool {
        false
    }
}
