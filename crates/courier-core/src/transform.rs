//! Per-event transform seam.

use crate::event::Event;

/// A pure, per-event pipeline stage.
///
/// A transform consumes one event and produces either a (possibly modified)
/// event or nothing, in which case the event is dropped from the pipeline.
/// Transforms hold no per-event state and may be shared across scheduler
/// threads.
pub trait Transform: Send + Sync {
    /// Applies the transform to one event.
    ///
    /// Returning `None` drops the event. Transforms never fail per event;
    /// anything unprocessable is a drop decision, not an error.
    fn apply(&self, event: Event) -> Option<Event>;

    /// Applies the transform to a batch, discarding dropped events.
    fn apply_batch(&self, events: Vec<Event>) -> Vec<Event> {
        events.into_iter().filter_map(|event| self.apply(event)).collect()
    }
}
