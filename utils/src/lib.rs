//! Shared utilities for the registry workspace.

pub mod logging;
pub mod time;

pub use logging::init_test_tracing;
pub use time::format_duration;
