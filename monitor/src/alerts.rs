//! Community alerts raised by the lifecycle and read back by the community.
//!
//! Alert ids derive from the event that raised them, so a retried write of
//! the same event is rejected by the store instead of duplicated.

use crate::error::MonitorError;
use registry_store::{AlertStore, StoreError};
use registry_types::{
    ActorId, AlertKind, AlertSeverity, CommunityAlert, Dispute, SubjectId, Timestamp,
    VerificationProof,
};
use tracing::info;

pub(crate) fn proof_removed_alert(
    proof: &VerificationProof,
    reason: &str,
    now: Timestamp,
) -> CommunityAlert {
    CommunityAlert::new(
        format!("{}-removed", proof.id),
        proof.subject.clone(),
        AlertKind::ProofRemoved,
        AlertSeverity::Error,
        format!(
            "{} proof for {} was removed after verification: {reason}",
            proof.platform, proof.target
        ),
        now,
    )
    .for_proof(proof.id.clone())
    .with_evidence(proof.target.clone())
}

pub(crate) fn proof_disputed_alert(
    proof: &VerificationProof,
    dispute: &Dispute,
    now: Timestamp,
) -> CommunityAlert {
    let mut alert = CommunityAlert::new(
        format!("{}-alert", dispute.id),
        proof.subject.clone(),
        AlertKind::ProofDisputed,
        AlertSeverity::Warning,
        format!(
            "{} proof for {} is disputed ({:?})",
            proof.platform, proof.target, dispute.report_type
        ),
        now,
    )
    .for_proof(proof.id.clone());
    if !dispute.evidence.is_empty() {
        alert = alert.with_evidence(dispute.evidence.clone());
    }
    alert
}

/// Store `alert`. A second raise of the same event is ignored.
pub fn raise_alert<S>(store: &S, alert: &CommunityAlert) -> Result<(), MonitorError>
where
    S: AlertStore + ?Sized,
{
    match store.append_alert(alert) {
        Ok(()) => {
            info!(
                alert = %alert.id,
                subject = %alert.subject,
                kind = ?alert.kind,
                severity = ?alert.severity,
                "community alert raised"
            );
            Ok(())
        }
        Err(StoreError::Duplicate(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Alerts across all subjects, newest first, optionally filtered by
/// acknowledgement.
pub fn community_alerts<S>(
    store: &S,
    acknowledged: Option<bool>,
) -> Result<Vec<CommunityAlert>, MonitorError>
where
    S: AlertStore + ?Sized,
{
    let mut alerts: Vec<_> = store
        .list_alerts()?
        .into_iter()
        .filter(|a| acknowledged.map_or(true, |want| a.is_acknowledged() == want))
        .collect();
    alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(alerts)
}

pub fn subject_alerts<S>(store: &S, subject: &SubjectId) -> Result<Vec<CommunityAlert>, MonitorError>
where
    S: AlertStore + ?Sized,
{
    Ok(store.alerts_for_subject(subject)?)
}

pub fn acknowledge_alert<S>(
    store: &S,
    id: &str,
    by: &ActorId,
    now: Timestamp,
) -> Result<CommunityAlert, MonitorError>
where
    S: AlertStore + ?Sized,
{
    let mut alert = store.get_alert(id).map_err(|e| match e {
        StoreError::NotFound(_) => MonitorError::AlertNotFound(id.to_string()),
        other => MonitorError::Store(other),
    })?;
    if !alert.acknowledge(by.clone(), now) {
        return Err(MonitorError::AlertAlreadyAcknowledged(alert.id));
    }
    store.update_alert(&alert)?;
    info!(alert = %alert.id, subject = %alert.subject, by = %by, "alert acknowledged");
    Ok(alert)
}
