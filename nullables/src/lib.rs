//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the engine (clock, storage, HTTP fetching,
//! chain access) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod clock;
pub mod fetcher;
pub mod store;

pub use chain::NullChain;
pub use clock::NullClock;
pub use fetcher::NullFetcher;
pub use store::NullStore;
