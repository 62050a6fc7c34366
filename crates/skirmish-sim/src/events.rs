//! Default world event sink.

use tracing::debug;

use skirmish_core::events::{WorldEvent, WorldEvents};

/// Logs every world event through `tracing`. Used when the embedder does not
/// inject a sink of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl WorldEvents for TracingEvents {
    fn emit(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::Explosion { position } => {
                debug!(x = position.x, y = position.y, "explosion");
            }
            WorldEvent::RecenterCamera { position } => {
                debug!(x = position.x, y = position.y, "recenter camera");
            }
        }
    }
}
