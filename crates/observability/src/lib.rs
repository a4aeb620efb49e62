//! Process-wide tracing/logging setup.

pub mod tracing;

pub use tracing::LogFormat;

/// Initialize tracing with the format taken from `LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
