//! Community reports and their resolution.
//!
//! Whether a report moves a proof to Disputed is not decided here. The caller
//! injects a [`DisputePolicy`]; quota, reputation-gated and open policies are
//! provided and selectable from configuration.

use crate::alerts::{proof_disputed_alert, proof_removed_alert, raise_alert};
use crate::error::MonitorError;
use crate::recheck::load_proof;
use registry_store::{AlertStore, DisputeStore, ProofStore};
use registry_types::{
    ActorId, AppealOutcome, Dispute, ProofId, ProofStatus, ReportType, Timestamp,
    VerificationProof,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What a policy sees when deciding on a report.
pub struct DisputeContext<'a> {
    pub proof: &'a VerificationProof,
    /// Open reports on the proof, the new one included.
    pub open_reports: &'a [Dispute],
    pub reporter_reputation: u32,
}

pub trait DisputePolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the proof should move to Disputed.
    fn accept(&self, ctx: &DisputeContext<'_>) -> bool;
}

/// Dispute once enough distinct reporters have open reports.
pub struct QuotaPolicy {
    pub reports_required: usize,
}

impl DisputePolicy for QuotaPolicy {
    fn name(&self) -> &'static str {
        "quota"
    }

    fn accept(&self, ctx: &DisputeContext<'_>) -> bool {
        ctx.open_reports.len() >= self.reports_required.max(1)
    }
}

/// Dispute on a single report from a sufficiently reputable reporter.
pub struct ReputationGate {
    pub min_reporter_reputation: u32,
}

impl DisputePolicy for ReputationGate {
    fn name(&self) -> &'static str {
        "reputation_gated"
    }

    fn accept(&self, ctx: &DisputeContext<'_>) -> bool {
        ctx.reporter_reputation >= self.min_reporter_reputation
    }
}

/// Any report disputes the proof.
pub struct OpenPolicy;

impl DisputePolicy for OpenPolicy {
    fn name(&self) -> &'static str {
        "open"
    }

    fn accept(&self, _ctx: &DisputeContext<'_>) -> bool {
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisputePolicyConfig {
    Quota { reports_required: usize },
    ReputationGated { min_reporter_reputation: u32 },
    Open,
}

impl Default for DisputePolicyConfig {
    fn default() -> Self {
        Self::Quota { reports_required: 3 }
    }
}

impl DisputePolicyConfig {
    pub fn build(&self) -> Box<dyn DisputePolicy> {
        match *self {
            Self::Quota { reports_required } => Box::new(QuotaPolicy { reports_required }),
            Self::ReputationGated {
                min_reporter_reputation,
            } => Box::new(ReputationGate {
                min_reporter_reputation,
            }),
            Self::Open => Box::new(OpenPolicy),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOutcome {
    pub dispute: Dispute,
    /// The proof's status after the report.
    pub proof_status: ProofStatus,
}

impl ReportOutcome {
    pub fn disputed(&self) -> bool {
        self.dispute.accepted
    }
}

/// Record a report and ask `policy` whether the proof is now disputed.
///
/// Reports on Removed or already Disputed proofs are recorded but cannot
/// change status. One open report per reporter per proof.
#[allow(clippy::too_many_arguments)]
pub fn file_report<S>(
    store: &S,
    policy: &dyn DisputePolicy,
    proof_id: &ProofId,
    reporter: &ActorId,
    report_type: ReportType,
    evidence: String,
    reporter_reputation: u32,
    now: Timestamp,
) -> Result<ReportOutcome, MonitorError>
where
    S: ProofStore + DisputeStore + AlertStore + ?Sized,
{
    let mut proof = load_proof(store, proof_id)?;
    let existing = store.disputes_for_proof(proof_id)?;
    if existing
        .iter()
        .any(|d| d.is_open() && &d.reporter == reporter)
    {
        return Err(MonitorError::DuplicateReport(proof_id.clone()));
    }

    let mut dispute = Dispute {
        id: format!("{}-{}", proof_id, existing.len() + 1),
        subject: proof.subject.clone(),
        proof_id: proof_id.clone(),
        reporter: reporter.clone(),
        report_type,
        evidence,
        created_at: now,
        accepted: false,
        resolution: None,
        resolved_at: None,
    };

    let mut open: Vec<Dispute> = existing.into_iter().filter(Dispute::is_open).collect();
    open.push(dispute.clone());
    let ctx = DisputeContext {
        proof: &proof,
        open_reports: &open,
        reporter_reputation,
    };
    if proof.status == ProofStatus::Active && policy.accept(&ctx) {
        dispute.accepted = true;
        proof.transition(
            ProofStatus::Disputed,
            now,
            format!("report {} accepted by {} policy", dispute.id, policy.name()),
        );
        store.update_proof(&proof)?;
        warn!(
            target: "registry::security",
            proof = %proof.id,
            subject = %proof.subject,
            dispute = %dispute.id,
            report_type = ?report_type,
            "dispute accepted"
        );
    } else {
        info!(proof = %proof.id, dispute = %dispute.id, "report recorded");
    }
    store.append_dispute(&dispute)?;
    if dispute.accepted {
        raise_alert(store, &proof_disputed_alert(&proof, &dispute, now))?;
    }

    Ok(ReportOutcome {
        dispute,
        proof_status: proof.status,
    })
}

/// Close a dispute: Upheld returns the proof to Active, Denied removes it.
/// Every open report on the proof is resolved with the same outcome.
///
/// Upholding is refused while another Active proof holds the same claim.
pub fn resolve_dispute<S>(
    store: &S,
    proof_id: &ProofId,
    outcome: AppealOutcome,
    now: Timestamp,
) -> Result<VerificationProof, MonitorError>
where
    S: ProofStore + DisputeStore + AlertStore + ?Sized,
{
    let mut proof = load_proof(store, proof_id)?;
    let to = match outcome {
        AppealOutcome::Upheld => ProofStatus::Active,
        AppealOutcome::Denied => ProofStatus::Removed,
    };
    if proof.status != ProofStatus::Disputed {
        return Err(MonitorError::InvalidTransition {
            from: proof.status,
            to,
        });
    }

    if to == ProofStatus::Active {
        let claim = proof.claim_key();
        let held = store
            .proofs_for_subject(&proof.subject)?
            .iter()
            .any(|p| p.id != proof.id && p.is_active() && p.claim_key() == claim);
        if held {
            return Err(MonitorError::ClaimAlreadyHeld(proof.id));
        }
    }

    let reason = format!("appeal {outcome:?}").to_lowercase();
    proof.transition(to, now, reason.clone());
    store.update_proof(&proof)?;
    if to == ProofStatus::Removed {
        raise_alert(store, &proof_removed_alert(&proof, &reason, now))?;
    }

    for mut dispute in store.disputes_for_proof(proof_id)? {
        if dispute.is_open() {
            dispute.resolution = Some(outcome);
            dispute.resolved_at = Some(now);
            store.update_dispute(&dispute)?;
        }
    }
    info!(proof = %proof.id, subject = %proof.subject, outcome = ?outcome, "dispute resolved");
    Ok(proof)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_config_parses_tagged() {
        let cfg: DisputePolicyConfig =
            serde_json::from_str(r#"{"kind":"reputation_gated","min_reporter_reputation":40}"#)
                .unwrap();
        assert_eq!(
            cfg,
            DisputePolicyConfig::ReputationGated {
                min_reporter_reputation: 40
            }
        );
        assert_eq!(cfg.build().name(), "reputation_gated");
        assert_eq!(DisputePolicyConfig::default().build().name(), "quota");
    }
}
