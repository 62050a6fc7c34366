//! Cleanup system: applies queued world commands and sweeps dead entities.
//!
//! Runs first in the tick so that nothing later in the tick ever sees an
//! entity that was destroyed between ticks.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use skirmish_core::commands::WorldCommand;
use skirmish_core::handle::EntityHandle;

use crate::registry::EntityRegistry;
use crate::teams::TeamModel;
use crate::world_setup;

/// Apply world commands in arrival order, then remove anything dead.
/// Uses a caller-owned buffer to avoid per-tick allocation.
pub fn run(
    registry: &mut EntityRegistry,
    teams: &mut TeamModel,
    commands: impl IntoIterator<Item = WorldCommand>,
    rng: &mut ChaCha8Rng,
    despawn_buffer: &mut Vec<EntityHandle>,
) {
    despawn_buffer.clear();

    for command in commands {
        match command {
            WorldCommand::Spawn { mut entity } => match world_setup::prepare(&mut entity, rng) {
                Ok(()) => {
                    registry.register(entity);
                }
                Err(err) => debug!(%err, "spawn request refused"),
            },
            WorldCommand::Destroy { handle } => {
                if !registry.contains(handle) {
                    debug!(%handle, "destroy request for stale handle ignored");
                    continue;
                }
                despawn_buffer.push(handle);
            }
        }
    }

    despawn_buffer.extend(registry.for_each_alive(|e| e.is_dead()));

    for handle in despawn_buffer.drain(..) {
        if registry.destroy(handle).is_some() {
            teams.forget(handle);
        }
    }
}
