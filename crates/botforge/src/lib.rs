//! Public surface for the Botforge bot framework.
//!
//! Re-exports the configuration crate and provides a small logging
//! initialization helper to keep bot setup consistent.

/// Re-export for convenience.
pub use botforge_config as config;

/// Initialize logging via env_logger.
///
/// Safe to call more than once; later calls are no-ops. Bots are expected
/// to call this early in startup so config-resolution warnings are not
/// lost.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
