//! Entity registry. Owns every entity and decides liveness.
//!
//! Backed by a hecs `World`. Each slot holds one tagged [`Entity`] plus the
//! order in which it was registered. hecs entity ids carry a generation, so a
//! handle to a destroyed entity stays detectably stale even after its slot is
//! reused.
//!
//! Entities are not split into per-concern components. Systems dispatch on
//! the [`EntityKind`](skirmish_core::entity::EntityKind) variant and the
//! capability traits, so the world is queried for `Entity` as a whole and
//! kind filtering happens in the predicate passed to [`EntityRegistry::scan`]
//! or [`EntityRegistry::for_each_alive`].
//!
//! Iteration hands out snapshots of handles rather than live borrows:
//! callers re-fetch each handle with [`EntityRegistry::get`] or
//! [`EntityRegistry::get_mut`] before acting, which makes it safe to destroy
//! entities while walking a snapshot.

use hecs::World;
use tracing::debug;

use skirmish_core::entity::Entity;
use skirmish_core::handle::EntityHandle;

/// Monotonic registration counter. Breaks ties deterministically wherever
/// "first registered wins".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SpawnOrder(u64);

fn to_hecs(handle: EntityHandle) -> Option<hecs::Entity> {
    hecs::Entity::from_bits(handle.to_bits().get())
}

fn from_hecs(entity: hecs::Entity) -> EntityHandle {
    EntityHandle::from_bits(entity.to_bits())
}

/// Flat store of all simulated entities.
#[derive(Default)]
pub struct EntityRegistry {
    world: World,
    next_order: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity and return its handle.
    pub fn register(&mut self, entity: Entity) -> EntityHandle {
        let order = SpawnOrder(self.next_order);
        self.next_order += 1;

        let kind = entity.unit_kind();
        let team = entity.team;
        let handle = from_hecs(self.world.spawn((entity, order)));
        debug!(%handle, ?kind, %team, "entity registered");
        handle
    }

    /// Remove an entity, returning its final state. Stale handles yield `None`.
    pub fn destroy(&mut self, handle: EntityHandle) -> Option<Entity> {
        let raw = to_hecs(handle)?;
        let entity = self.world.remove_one::<Entity>(raw).ok()?;
        let _ = self.world.despawn(raw);
        debug!(%handle, kind = ?entity.unit_kind(), "entity destroyed");
        Some(entity)
    }

    pub fn contains(&self, handle: EntityHandle) -> bool {
        to_hecs(handle).is_some_and(|raw| self.world.contains(raw))
    }

    /// Read access to a live entity.
    pub fn get(&self, handle: EntityHandle) -> Option<hecs::Ref<'_, Entity>> {
        self.world.get::<&Entity>(to_hecs(handle)?).ok()
    }

    /// Write access to a live entity.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.world.query_one_mut::<&mut Entity>(to_hecs(handle)?).ok()
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    /// Visit every live entity and keep what `f` returns, in registration
    /// order.
    pub fn scan<T>(&self, mut f: impl FnMut(EntityHandle, &Entity) -> Option<T>) -> Vec<T> {
        let mut found: Vec<(SpawnOrder, T)> = Vec::new();
        for (raw, (entity, order)) in self.world.query::<(&Entity, &SpawnOrder)>().iter() {
            if let Some(item) = f(from_hecs(raw), entity) {
                found.push((*order, item));
            }
        }
        found.sort_by_key(|(order, _)| *order);
        found.into_iter().map(|(_, item)| item).collect()
    }

    /// Handles of live entities matching `predicate`, in registration order.
    ///
    /// The result reflects the registry at call time. Entities destroyed
    /// afterwards still appear in it; check liveness before use.
    pub fn for_each_alive(&self, predicate: impl Fn(&Entity) -> bool) -> AliveHandles {
        AliveHandles(self.scan(|handle, entity| predicate(entity).then_some(handle)))
    }

    /// Mutate every live entity. Order is unspecified.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(EntityHandle, &mut Entity)) {
        for (raw, entity) in self.world.query_mut::<&mut Entity>() {
            f(from_hecs(raw), entity);
        }
    }
}

/// Snapshot of live handles, restartable and cheap to iterate repeatedly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliveHandles(Vec<EntityHandle>);

impl AliveHandles {
    pub fn iter(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<EntityHandle> {
        self.0.get(index).copied()
    }

    pub fn first(&self) -> Option<EntityHandle> {
        self.0.first().copied()
    }

    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.0.contains(&handle)
    }
}

impl IntoIterator for AliveHandles {
    type Item = EntityHandle;
    type IntoIter = std::vec::IntoIter<EntityHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
