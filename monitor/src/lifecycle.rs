//! The recheck half of the proof state machine.
//!
//! A failing recheck does not remove a proof at once. The first failure opens
//! a pending-removal window stamped with the time it was first seen; the proof
//! is removed only when the failure has lasted the platform's grace period.
//! A passing recheck inside the window closes it without touching status.

use registry_types::{GracePeriods, ProofStatus, Timestamp, VerificationProof};
use registry_verification::CheckOutcome;

/// What one recheck did to a proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Check passed, nothing was pending.
    Healthy,
    /// Check passed and cleared an earlier failure.
    Recovered,
    /// First failure; grace starts now.
    PendingRemoval { since: Timestamp },
    /// Still failing inside the grace window.
    StillPending { since: Timestamp, remaining_secs: u64 },
    /// Grace elapsed with the failure unresolved.
    Removed { reason: String },
    /// The proof is no longer monitored.
    Ignored,
}

impl LifecycleEvent {
    /// Whether the proof record was modified and must be written back.
    pub fn touched_record(&self) -> bool {
        matches!(
            self,
            Self::Recovered | Self::PendingRemoval { .. } | Self::Removed { .. }
        )
    }

    /// Whether the proof's status changed, which invalidates the score.
    pub fn changed_status(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }
}

/// Fold one recheck outcome into `proof`.
///
/// Transient failures use `max(grace, transient_floor_secs)` so an outage of
/// the checking infrastructure cannot remove a zero-grace proof.
pub fn apply_outcome(
    proof: &mut VerificationProof,
    outcome: &CheckOutcome,
    now: Timestamp,
    grace: &GracePeriods,
    transient_floor_secs: u64,
) -> LifecycleEvent {
    if !proof.is_monitored() {
        return LifecycleEvent::Ignored;
    }

    let (reason, window) = match outcome {
        CheckOutcome::Present => {
            return match proof.pending_removal_since.take() {
                Some(_) => LifecycleEvent::Recovered,
                None => LifecycleEvent::Healthy,
            };
        }
        CheckOutcome::Missing(reason) => (reason, grace.for_platform(&proof.platform)),
        CheckOutcome::Transient(reason) => (
            reason,
            grace.for_platform(&proof.platform).max(transient_floor_secs),
        ),
    };

    let first_failure = proof.pending_removal_since.is_none();
    let since = *proof.pending_removal_since.get_or_insert(now);
    let elapsed = since.elapsed_since(now);

    if elapsed >= window {
        proof.transition(
            ProofStatus::Removed,
            now,
            format!("recheck failing since {since}: {reason}"),
        );
        return LifecycleEvent::Removed {
            reason: reason.clone(),
        };
    }

    if first_failure {
        LifecycleEvent::PendingRemoval { since }
    } else {
        LifecycleEvent::StillPending {
            since,
            remaining_secs: window - elapsed,
        }
    }
}
