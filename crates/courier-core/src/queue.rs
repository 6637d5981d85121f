//! Transactional queue contract provided by the host runtime.
//!
//! The delivery stage consumes events through these traits without knowing
//! anything about the backing store. One transaction wraps exactly one
//! dequeue-and-process attempt: `begin`, at most one `take`, then exactly one
//! of `commit` or `rollback`. Both settling operations consume the
//! transaction, so the type system rules out double-settlement; whatever is
//! neither committed nor rolled back is released on drop by the
//! implementation.

use async_trait::async_trait;

use crate::{error::QueueError, event::Event};

/// A source of transactional event consumption.
///
/// Implementations are provided by the hosting pipeline runtime. Multiple
/// consumers may hold the same queue concurrently; isolation between their
/// transactions is the implementation's responsibility.
#[async_trait]
pub trait EventQueue: Send + Sync {
    /// Opens a new transaction scoped to a single consume attempt.
    async fn begin(&self) -> Result<Box<dyn QueueTransaction>, QueueError>;
}

/// A single begin-to-settle unit of work against the queue.
#[async_trait]
pub trait QueueTransaction: Send {
    /// Takes at most one event from the queue.
    ///
    /// Returns `None` when no event is currently available; absence of data
    /// is not an error.
    async fn take(&mut self) -> Result<Option<Event>, QueueError>;

    /// Commits the transaction, permanently consuming any taken event.
    async fn commit(self: Box<Self>) -> Result<(), QueueError>;

    /// Rolls the transaction back, returning any taken event to the queue
    /// for redelivery.
    async fn rollback(self: Box<Self>) -> Result<(), QueueError>;
}
