//! Verification proofs and their lifecycle status.
//!
//! A proof is never deleted. Status changes are appended to `history` so the
//! record stays auditable after removal.

use crate::challenge::{ClaimKey, VerificationMethod};
use crate::ids::{ChallengeId, ProofId, SubjectId};
use crate::platform::{ChainType, Platform};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofStatus {
    Active,
    Removed,
    Disputed,
}

/// Where a proof can be re-checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofLocator {
    /// Fetched over HTTP; `expected` must appear in the body.
    Url { url: String, expected: String },
    /// Read `key` from public state at `address` and compare with `expected`.
    ChainState {
        chain: ChainType,
        address: String,
        key: String,
        expected: String,
    },
    /// A signature over `message`; re-verified against the address key.
    Signature {
        chain: ChainType,
        address: String,
        message: String,
        signature: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: ProofStatus,
    pub to: ProofStatus,
    pub at: Timestamp,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationProof {
    pub id: ProofId,
    pub subject: SubjectId,
    pub platform: Platform,
    pub target: String,
    pub challenge_id: ChallengeId,
    pub locator: ProofLocator,
    pub method: VerificationMethod,
    pub verified_at: Timestamp,
    pub status: ProofStatus,
    pub required_text: Option<String>,
    /// First time a recheck failed while no success has been seen since.
    pub pending_removal_since: Option<Timestamp>,
    pub history: Vec<StatusChange>,
}

impl VerificationProof {
    pub fn claim_key(&self) -> ClaimKey {
        ClaimKey::new(self.subject.clone(), self.platform, self.target.clone())
    }

    pub fn is_active(&self) -> bool {
        self.status == ProofStatus::Active
    }

    /// Active and Disputed proofs are rechecked; Removed is terminal.
    pub fn is_monitored(&self) -> bool {
        matches!(self.status, ProofStatus::Active | ProofStatus::Disputed)
    }

    pub fn is_pending_removal(&self) -> bool {
        self.pending_removal_since.is_some()
    }

    /// Move to `to`, recording the change. A no-op transition records nothing.
    ///
    /// The failure clock survives moves between Active and Disputed; only
    /// removal closes it.
    pub fn transition(&mut self, to: ProofStatus, at: Timestamp, reason: impl Into<String>) {
        if self.status == to {
            return;
        }
        self.history.push(StatusChange {
            from: self.status,
            to,
            at,
            reason: reason.into(),
        });
        self.status = to;
        if to == ProofStatus::Removed {
            self.pending_removal_since = None;
        }
    }
}

/// Outcome of a verification attempt. Failure is a normal result, not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    pub message: String,
    pub verified_at: Option<Timestamp>,
    pub proof_id: Option<ProofId>,
}

impl VerificationResult {
    pub fn verified(proof_id: ProofId, at: Timestamp) -> Self {
        Self {
            success: true,
            message: "verification successful".to_string(),
            verified_at: Some(at),
            proof_id: Some(proof_id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            verified_at: None,
            proof_id: None,
        }
    }
}
