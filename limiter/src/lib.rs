//! Sliding-window rate limiting.
//!
//! Each key keeps the timestamps of its admitted attempts inside the trailing
//! window. Denial is a normal negative answer, never an error. State is
//! process-local and safe to lose on restart.

mod actions;
mod window;

pub use actions::{Action, ActionLimiter, RateLimits};
pub use window::{RateLimit, RateLimiter};
