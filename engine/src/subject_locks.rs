//! Per-subject mutation locks.
//!
//! Operations on different subjects run concurrently. Operations on the same
//! subject are serialized, so issuance and proof creation for one claim can
//! never interleave.

use registry_types::SubjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Held for the duration of one mutation on one subject.
pub struct SubjectGuard {
    _guard: OwnedMutexGuard<()>,
}

#[derive(Default)]
pub struct SubjectLocks {
    locks: Mutex<HashMap<SubjectId, Arc<Mutex<()>>>>,
}

impl SubjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `subject`.
    pub async fn lock(&self, subject: &SubjectId) -> SubjectGuard {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(subject.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        SubjectGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of subjects with a lock entry.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Drop entries nobody holds or waits on.
    pub async fn cleanup(&self) -> usize {
        let mut locks = self.locks.lock().await;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_subject_is_serialized() {
        let locks = Arc::new(SubjectLocks::new());
        let inside = Arc::new(AtomicU64::new(0));
        let max_seen = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _g = locks.lock(&SubjectId::from("acme")).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_subjects_do_not_block() {
        let locks = SubjectLocks::new();
        let _a = locks.lock(&SubjectId::from("a")).await;
        let b = tokio::time::timeout(Duration::from_secs(1), locks.lock(&SubjectId::from("b"))).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn cleanup_removes_idle_entries() {
        let locks = SubjectLocks::new();
        let held = locks.lock(&SubjectId::from("a")).await;
        drop(locks.lock(&SubjectId::from("b")).await);
        assert_eq!(locks.tracked().await, 2);
        assert_eq!(locks.cleanup().await, 1);
        assert_eq!(locks.tracked().await, 1);
        drop(held);
        assert_eq!(locks.cleanup().await, 1);
    }
}
