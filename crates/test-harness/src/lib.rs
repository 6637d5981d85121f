//! Shared test fixtures for the courier pipeline.
//!
//! Provides an in-memory transactional queue with the same
//! begin/take/commit/rollback semantics a production host runtime supplies,
//! so the delivery stage can be exercised without external infrastructure.

#![forbid(unsafe_code)]

pub mod queue;

pub use queue::InMemoryQueue;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes test logging once per process.
///
/// Respects `RUST_LOG`; defaults to showing warnings so drop decisions are
/// visible in test output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}
