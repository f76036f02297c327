//! The recurring recheck sweep.
//!
//! Each monitored proof is probed on its own task, at most
//! `sweep_concurrency` at a time. Probes hold no lock; only folding the
//! outcome into the stored proof takes the subject lock.

use crate::engine::RegistryEngine;
use crate::error::EngineError;
use registry_monitor::LifecycleEvent;
use registry_store::RegistryStore;
use registry_types::VerificationProof;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Tally of one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub checked: usize,
    pub healthy: usize,
    pub recovered: usize,
    /// Newly pending or still pending.
    pub pending: usize,
    pub removed: usize,
    pub errors: usize,
}

impl SweepReport {
    fn record(&mut self, event: &LifecycleEvent) {
        self.checked += 1;
        match event {
            LifecycleEvent::Healthy => self.healthy += 1,
            LifecycleEvent::Recovered => self.recovered += 1,
            LifecycleEvent::PendingRemoval { .. } | LifecycleEvent::StillPending { .. } => {
                self.pending += 1
            }
            LifecycleEvent::Removed { .. } => self.removed += 1,
            LifecycleEvent::Ignored => {}
        }
    }
}

impl<S: RegistryStore + 'static> RegistryEngine<S> {
    /// Recheck one proof and fold the result in.
    async fn recheck_one(&self, proof: VerificationProof) -> Result<LifecycleEvent, EngineError> {
        let outcome = self.monitor.probe(&proof).await;
        self.metrics.rechecks.inc();
        if !outcome.is_present() {
            self.metrics.recheck_failures.inc();
        }

        let _guard = self.locks.lock(&proof.subject).await;
        let event = self
            .monitor
            .apply(&*self.store, &proof.id, &outcome, self.now())?;
        if let LifecycleEvent::Removed { .. } = event {
            self.metrics.proofs_removed.inc();
        }
        if event.changed_status() {
            self.recompute(&proof.subject)?;
        }
        Ok(event)
    }

    /// Recheck every monitored proof once.
    pub async fn run_sweep(self: &Arc<Self>) -> Result<SweepReport, EngineError> {
        let proofs = self.store.monitored_proofs()?;
        let semaphore = Arc::new(Semaphore::new(self.config.sweep_concurrency));
        let mut tasks = JoinSet::new();
        debug!(proofs = proofs.len(), "recheck sweep starting");

        for proof in proofs {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let engine = Arc::clone(self);
            tasks.spawn(async move {
                let id = proof.id.clone();
                let result = engine.recheck_one(proof).await;
                drop(permit);
                (id, result)
            });
        }

        let mut report = SweepReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(event))) => report.record(&event),
                Ok((id, Err(e))) => {
                    report.errors += 1;
                    warn!(proof = %id, error = %e, "recheck failed");
                }
                Err(e) => {
                    report.errors += 1;
                    error!(error = %e, "recheck task panicked");
                }
            }
        }

        self.monitoring_stats()?;
        let purged = self.limiter.purge_idle(self.now());
        let released = self.locks.cleanup().await;
        info!(
            checked = report.checked,
            pending = report.pending,
            removed = report.removed,
            recovered = report.recovered,
            errors = report.errors,
            purged_rate_keys = purged,
            released_locks = released,
            "recheck sweep finished"
        );
        Ok(report)
    }
}

/// Run a sweep every `sweep_interval_secs` until shutdown is signalled.
/// The first sweep starts immediately.
pub fn spawn_sweeper<S>(
    engine: Arc<RegistryEngine<S>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()>
where
    S: RegistryStore + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(engine.config().sweep_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("recheck sweeper shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = engine.run_sweep().await {
                        error!(error = %e, "recheck sweep aborted");
                    }
                }
            }
        }
    })
}
