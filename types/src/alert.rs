//! Community alerts: notices raised when trust in a subject drops.

use crate::ids::{ActorId, ProofId, SubjectId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// A proof failed rechecks past its grace period, or lost an appeal.
    ProofRemoved,
    /// A community report moved a proof to Disputed.
    ProofDisputed,
    /// Someone other than the owner tried to mutate the subject.
    SecurityEvent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityAlert {
    pub id: String,
    pub subject: SubjectId,
    pub proof_id: Option<ProofId>,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub evidence: Vec<String>,
    pub created_at: Timestamp,
    pub acknowledged_by: Option<ActorId>,
    pub acknowledged_at: Option<Timestamp>,
}

impl CommunityAlert {
    pub fn new(
        id: String,
        subject: SubjectId,
        kind: AlertKind,
        severity: AlertSeverity,
        message: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            subject,
            proof_id: None,
            kind,
            severity,
            message: message.into(),
            evidence: Vec::new(),
            created_at,
            acknowledged_by: None,
            acknowledged_at: None,
        }
    }

    pub fn for_proof(mut self, proof: ProofId) -> Self {
        self.proof_id = Some(proof);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged_at.is_some()
    }

    /// Mark acknowledged. Returns false if it already was.
    pub fn acknowledge(&mut self, by: ActorId, at: Timestamp) -> bool {
        if self.is_acknowledged() {
            return false;
        }
        self.acknowledged_by = Some(by);
        self.acknowledged_at = Some(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledge_is_once_only() {
        let mut alert = CommunityAlert::new(
            "a1".into(),
            "acme".into(),
            AlertKind::ProofRemoved,
            AlertSeverity::Error,
            "domain proof removed",
            Timestamp::new(5),
        )
        .for_proof("p1".into());
        assert!(!alert.is_acknowledged());
        assert!(alert.acknowledge("alice".into(), Timestamp::new(6)));
        assert!(!alert.acknowledge("bob".into(), Timestamp::new(7)));
        assert_eq!(alert.acknowledged_by, Some(ActorId::from("alice")));
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(AlertSeverity::Critical > AlertSeverity::Error);
        assert!(AlertSeverity::Warning > AlertSeverity::Info);
    }
}
