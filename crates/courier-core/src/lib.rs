//! Core domain types and host-runtime contracts for the courier pipeline.
//!
//! Defines the [`Event`] payload type moving through the pipeline, the
//! [`Transform`] seam implemented by per-event stages, and the transactional
//! [`EventQueue`] contract the hosting runtime provides to the delivery
//! stage. The other crates depend on these foundational types; this crate
//! depends on nothing pipeline-specific.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod queue;
pub mod transform;

pub use error::QueueError;
pub use event::Event;
pub use queue::{EventQueue, QueueTransaction};
pub use transform::Transform;
