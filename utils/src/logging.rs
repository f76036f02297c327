//! Tracing initialization for tests.

use tracing_subscriber::EnvFilter;

/// Route logs through the test harness's captured output. Safe to call from
/// every test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
