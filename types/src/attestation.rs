//! Community attestations and the reputation state derived from them.

use crate::ids::{ActorId, SubjectId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// One organization vouching for another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement {
    pub endorser: SubjectId,
    pub endorser_actor: ActorId,
    pub message: String,
    pub timestamp: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub author_name: String,
    pub role: String,
    pub message: String,
    pub timestamp: Timestamp,
    /// The only mutable field; set by the owner's verification step.
    pub verified: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vouch {
    pub id: String,
    pub voucher: ActorId,
    pub message: String,
    pub timestamp: Timestamp,
    /// Derived from the voucher's activity at the time of vouching.
    pub weight: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attestation {
    Endorsement(Endorsement),
    Testimonial(Testimonial),
    Vouch(Vouch),
}

/// Append-only community record for one subject.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationState {
    pub peer_endorsements: Vec<Endorsement>,
    pub testimonials: Vec<Testimonial>,
    pub vouches: Vec<Vouch>,
    /// Recomputed, never set by hand.
    pub reputation_score: u32,
    pub reputation_staked: u64,
}

impl ReputationState {
    pub fn push(&mut self, attestation: Attestation) {
        match attestation {
            Attestation::Endorsement(e) => self.peer_endorsements.push(e),
            Attestation::Testimonial(t) => self.testimonials.push(t),
            Attestation::Vouch(v) => self.vouches.push(v),
        }
    }

    pub fn verified_testimonials(&self) -> usize {
        self.testimonials.iter().filter(|t| t.verified).count()
    }

    pub fn has_endorsement_from(&self, endorser: &SubjectId) -> bool {
        self.peer_endorsements.iter().any(|e| &e.endorser == endorser)
    }

    pub fn total_vouch_weight(&self) -> u64 {
        self.vouches.iter().map(|v| u64::from(v.weight)).sum()
    }
}
