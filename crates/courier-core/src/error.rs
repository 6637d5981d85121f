//! Error types for queue interactions.

use thiserror::Error;

/// Failures surfaced by the host runtime's queue implementation.
///
/// The pipeline stages treat these as infrastructure conditions: a failed
/// `take` becomes a rollback-and-backoff decision, while failures to open or
/// settle a transaction propagate to the scheduler.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue could not provide a transaction.
    #[error("queue unavailable: {message}")]
    Unavailable {
        /// Description of why the queue could not be reached.
        message: String,
    },

    /// A transaction operation (take, commit, rollback) failed.
    #[error("queue transaction failed: {message}")]
    Transaction {
        /// Description of the failed operation.
        message: String,
    },
}

impl QueueError {
    /// Creates an unavailable error from a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    /// Creates a transaction error from a message.
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction { message: message.into() }
    }
}
