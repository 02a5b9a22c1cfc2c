// Hearing Test Core - audiogram data model
// Test results, per-ear audiograms and their document-store record format

// Module declarations
pub mod api;
pub mod audio;
pub mod audiogram;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use api::*;

/// Install the global tracing subscriber
///
/// `tracing` is built with its `log` feature, so records from the `log`
/// macros reach the same output. Later calls are no-ops.
pub fn init_logging() {
    if tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .try_init()
        .is_ok()
    {
        tracing::info!("Logging initialized");
    }
}
