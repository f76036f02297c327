use registry_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

/// At most `max_attempts` admissions per key in any `window_secs` span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub max_attempts: u32,
    pub window_secs: u64,
}

impl RateLimit {
    pub const fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window_secs,
        }
    }
}

/// Per-key sliding window. One mutex guards all keys so `admit` and
/// `remaining` on the same key can never interleave.
pub struct RateLimiter<K> {
    limit: RateLimit,
    windows: Mutex<HashMap<K, VecDeque<Timestamp>>>,
}

impl<K: Eq + Hash + Clone> RateLimiter<K> {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<K, VecDeque<Timestamp>>> {
        // Losing window state only relaxes limiting, so a poisoned lock is reused.
        self.windows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn prune(window: &mut VecDeque<Timestamp>, window_secs: u64, now: Timestamp) {
        while let Some(oldest) = window.front() {
            if oldest.elapsed_since(now) >= window_secs {
                window.pop_front();
            } else {
                break;
            }
        }
    }

    /// Admit one attempt for `key` at `now`. Records the attempt only on success.
    pub fn admit(&self, key: &K, now: Timestamp) -> bool {
        let mut windows = self.windows();
        let window = windows.entry(key.clone()).or_default();
        Self::prune(window, self.limit.window_secs, now);
        if window.len() < self.limit.max_attempts as usize {
            window.push_back(now);
            true
        } else {
            false
        }
    }

    /// Attempts left for `key` at `now`. Prunes but does not record.
    pub fn remaining(&self, key: &K, now: Timestamp) -> u32 {
        let mut windows = self.windows();
        let Some(window) = windows.get_mut(key) else {
            return self.limit.max_attempts;
        };
        Self::prune(window, self.limit.window_secs, now);
        self.limit.max_attempts.saturating_sub(window.len() as u32)
    }

    /// Seconds until the next attempt would be admitted; zero if one would be now.
    pub fn retry_after(&self, key: &K, now: Timestamp) -> u64 {
        let mut windows = self.windows();
        let Some(window) = windows.get_mut(key) else {
            return 0;
        };
        Self::prune(window, self.limit.window_secs, now);
        if window.len() < self.limit.max_attempts as usize {
            return 0;
        }
        window
            .front()
            .map(|oldest| self.limit.window_secs - oldest.elapsed_since(now))
            .unwrap_or(0)
    }

    /// Drop keys whose windows are empty at `now`. Returns how many were dropped.
    pub fn purge_idle(&self, now: Timestamp) -> usize {
        let mut windows = self.windows();
        let before = windows.len();
        let window_secs = self.limit.window_secs;
        windows.retain(|_, window| {
            Self::prune(window, window_secs, now);
            !window.is_empty()
        });
        before - windows.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows().len()
    }
}
