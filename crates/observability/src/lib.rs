//! Process-wide tracing setup shared by the binaries.

pub mod subscriber;

pub use subscriber::{DEFAULT_FILTER, LogFormat};

/// Initialize tracing with JSON output and `RUST_LOG` filtering.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init(LogFormat::from_env());
}
