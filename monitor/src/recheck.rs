//! Rechecking stored proofs against their locators.
//!
//! Probing is I/O and runs without any lock held. Applying the outcome reloads
//! the proof first, so a status change made while the probe was in flight
//! (a dispute, a resolution) is never overwritten.

use crate::alerts::{proof_removed_alert, raise_alert};
use crate::error::MonitorError;
use crate::lifecycle::{apply_outcome, LifecycleEvent};
use registry_store::{AlertStore, ProofStore, StoreError};
use registry_types::{GracePeriods, ProofId, Timestamp, VerificationProof};
use registry_verification::{CheckOutcome, Prober};
use tracing::{debug, info, warn};

pub struct Monitor {
    prober: Prober,
    grace: GracePeriods,
    transient_floor_secs: u64,
}

impl Monitor {
    pub fn new(prober: Prober, grace: GracePeriods, transient_floor_secs: u64) -> Self {
        Self {
            prober,
            grace,
            transient_floor_secs,
        }
    }

    pub fn grace(&self) -> &GracePeriods {
        &self.grace
    }

    /// Run the check the proof's locator describes. Bounded by the prober's timeout.
    pub async fn probe(&self, proof: &VerificationProof) -> CheckOutcome {
        self.prober.locator(&proof.locator).await
    }

    /// Fold `outcome` into the stored proof and persist any change. A removal
    /// also raises a community alert.
    pub fn apply<S>(
        &self,
        store: &S,
        proof_id: &ProofId,
        outcome: &CheckOutcome,
        now: Timestamp,
    ) -> Result<LifecycleEvent, MonitorError>
    where
        S: ProofStore + AlertStore + ?Sized,
    {
        let mut proof = load_proof(store, proof_id)?;
        let event = apply_outcome(
            &mut proof,
            outcome,
            now,
            &self.grace,
            self.transient_floor_secs,
        );
        if event.touched_record() {
            store.update_proof(&proof)?;
        }
        if let LifecycleEvent::Removed { reason } = &event {
            raise_alert(store, &proof_removed_alert(&proof, reason, now))?;
        }

        match &event {
            LifecycleEvent::Healthy | LifecycleEvent::Ignored => {}
            LifecycleEvent::Recovered => {
                info!(proof = %proof.id, subject = %proof.subject, "proof recovered")
            }
            LifecycleEvent::PendingRemoval { since } => info!(
                proof = %proof.id,
                subject = %proof.subject,
                platform = %proof.platform,
                since = since.as_secs(),
                reason = outcome.reason().unwrap_or_default(),
                "proof entered pending removal"
            ),
            LifecycleEvent::StillPending { remaining_secs, .. } => debug!(
                proof = %proof.id,
                remaining_secs,
                "proof still failing"
            ),
            LifecycleEvent::Removed { reason } => warn!(
                target: "registry::security",
                proof = %proof.id,
                subject = %proof.subject,
                platform = %proof.platform,
                target_claim = %proof.target,
                reason = %reason,
                "proof removed"
            ),
        }
        Ok(event)
    }

    /// Probe then apply, for callers that do not need to split the two.
    pub async fn recheck<S>(
        &self,
        store: &S,
        proof_id: &ProofId,
        now: Timestamp,
    ) -> Result<LifecycleEvent, MonitorError>
    where
        S: ProofStore + AlertStore + ?Sized,
    {
        let proof = load_proof(store, proof_id)?;
        if !proof.is_monitored() {
            return Ok(LifecycleEvent::Ignored);
        }
        let outcome = self.probe(&proof).await;
        self.apply(store, proof_id, &outcome, now)
    }
}

pub(crate) fn load_proof<S>(store: &S, id: &ProofId) -> Result<VerificationProof, MonitorError>
where
    S: ProofStore + ?Sized,
{
    store.get_proof(id).map_err(|e| match e {
        StoreError::NotFound(_) => MonitorError::ProofNotFound(id.clone()),
        other => MonitorError::Store(other),
    })
}
