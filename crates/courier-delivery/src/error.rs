//! Error types for delivery operations.
//!
//! Only two kinds of failure escape the sink: configuration problems at
//! construction and queue infrastructure faults while settling a transaction.
//! Everything that happens between take and settle is policy, encoded as a
//! [`crate::DeliveryOutcome`] plus a log line rather than an error.

use thiserror::Error;

use courier_core::QueueError;

/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Failures that escape the delivery sink.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Invalid sink configuration, fatal at construction.
    #[error("invalid sink configuration: {message}")]
    Configuration {
        /// Configuration error message.
        message: String,
    },

    /// The queue failed to open or settle a transaction.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl DeliveryError {
    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}
