//! Community reports against proofs.

use crate::error::TypesError;
use crate::ids::{ActorId, ProofId, SubjectId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    ProofRemoved,
    FakeProof,
    Impersonation,
    SuspiciousActivity,
    Other,
}

impl FromStr for ReportType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proof_removed" => Ok(Self::ProofRemoved),
            "fake_proof" => Ok(Self::FakeProof),
            "impersonation" => Ok(Self::Impersonation),
            "suspicious_activity" => Ok(Self::SuspiciousActivity),
            "other" => Ok(Self::Other),
            other => Err(TypesError::UnknownReportType(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppealOutcome {
    /// The proof is legitimate; back to Active.
    Upheld,
    /// The report stands; the proof is Removed.
    Denied,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: String,
    pub subject: SubjectId,
    pub proof_id: ProofId,
    pub reporter: ActorId,
    pub report_type: ReportType,
    pub evidence: String,
    pub created_at: Timestamp,
    /// Whether this report moved the proof to Disputed.
    pub accepted: bool,
    pub resolution: Option<AppealOutcome>,
    pub resolved_at: Option<Timestamp>,
}

impl Dispute {
    pub fn is_open(&self) -> bool {
        self.resolution.is_none()
    }
}
