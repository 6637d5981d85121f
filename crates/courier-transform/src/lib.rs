//! Per-event transforms for the courier pipeline.
//!
//! Currently hosts a single transform: [`JsonFieldExtractor`], which narrows
//! a JSON object body down to the string value of one configured top-level
//! field and drops everything else. Transforms are pure per event and plug
//! into the pipeline through the [`courier_core::Transform`] seam.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod extract;

pub use extract::{JsonFieldExtractor, TransformError};
