//! Transactional HTTP delivery sink.
//!
//! Drains events from a host-provided queue one at a time and forwards each
//! as an HTTP POST to a configured endpoint, translating the response into a
//! commit/rollback decision and a scheduler outcome. The central policy:
//! retry only on signals that plausibly mean the receiver is temporarily
//! unavailable (503, unreadable responses, transport failures); consume
//! everything else so a single poisoned event can never wedge the queue.
//!
//! One [`HttpSink::process`] call performs at most one dequeue-and-send
//! attempt inside one queue transaction. Backoff pacing between calls is the
//! scheduler's responsibility.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod sink;

pub use config::DeliveryConfig;
pub use error::{DeliveryError, Result};
pub use sink::{DeliveryOutcome, HttpSink};
