//! Community attestations: endorsements, testimonials, vouches and stake.
//!
//! Every operation appends (or, for testimonial verification and stake,
//! updates) the subject's reputation record. Callers recompute scores
//! afterwards with [`crate::recompute_scores`]. Text fields arrive already
//! sanitized.

use crate::error::ReputationError;
use registry_store::{AttestationStore, IdentityStore};
use registry_types::{
    ActorId, Attestation, Endorsement, ReputationState, ReputationWeights, SubjectId, Testimonial,
    Timestamp, Vouch,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Weight of a new vouch from a voucher who has already given `vouches_given`.
///
/// Established community members count for more: 0-2 → 1, 3-10 → 2,
/// 11-25 → 3, beyond → 5.
pub fn voucher_weight(vouches_given: usize) -> u32 {
    match vouches_given {
        0..=2 => 1,
        3..=10 => 2,
        11..=25 => 3,
        _ => 5,
    }
}

fn require_subject<S>(store: &S, subject: &SubjectId) -> Result<(), ReputationError>
where
    S: IdentityStore + ?Sized,
{
    if store.identity_exists(subject)? {
        Ok(())
    } else {
        Err(ReputationError::SubjectNotFound(subject.clone()))
    }
}

/// One organization endorsing another. The endorser must exist, differ from
/// the subject, carry enough reputation and not have endorsed before.
pub fn endorse<S>(
    store: &S,
    endorser: &SubjectId,
    endorser_actor: &ActorId,
    subject: &SubjectId,
    message: String,
    weights: &ReputationWeights,
    now: Timestamp,
) -> Result<Endorsement, ReputationError>
where
    S: IdentityStore + AttestationStore + ?Sized,
{
    if endorser == subject {
        return Err(ReputationError::SelfEndorsement);
    }
    require_subject(store, subject)?;
    let endorsing = store
        .get_identity(endorser)
        .map_err(|e| ReputationError::from_lookup(endorser, e))?;
    if endorsing.reputation_score < weights.min_endorser_reputation {
        return Err(ReputationError::EndorserReputationTooLow {
            have: endorsing.reputation_score,
            need: weights.min_endorser_reputation,
        });
    }
    if store.get_reputation(subject)?.has_endorsement_from(endorser) {
        return Err(ReputationError::AlreadyEndorsed {
            endorser: endorser.clone(),
            subject: subject.clone(),
        });
    }

    let endorsement = Endorsement {
        endorser: endorser.clone(),
        endorser_actor: endorser_actor.clone(),
        message,
        timestamp: now,
    };
    store.append_attestation(subject, &Attestation::Endorsement(endorsement.clone()))?;
    info!(%subject, %endorser, "endorsement added");
    Ok(endorsement)
}

/// Testimonials enter unverified.
pub fn add_testimonial<S>(
    store: &S,
    subject: &SubjectId,
    author_name: String,
    role: String,
    message: String,
    now: Timestamp,
) -> Result<Testimonial, ReputationError>
where
    S: IdentityStore + AttestationStore + ?Sized,
{
    require_subject(store, subject)?;
    let existing = store.get_reputation(subject)?.testimonials.len();
    let testimonial = Testimonial {
        id: format!("testimonial-{}", existing + 1),
        author_name,
        role,
        message,
        timestamp: now,
        verified: false,
    };
    store.append_attestation(subject, &Attestation::Testimonial(testimonial.clone()))?;
    info!(%subject, testimonial = %testimonial.id, "testimonial added");
    Ok(testimonial)
}

/// Mark a testimonial verified. Idempotent.
pub fn verify_testimonial<S>(
    store: &S,
    subject: &SubjectId,
    testimonial_id: &str,
) -> Result<Testimonial, ReputationError>
where
    S: IdentityStore + AttestationStore + ?Sized,
{
    require_subject(store, subject)?;
    let mut state = store.get_reputation(subject)?;
    let testimonial = state
        .testimonials
        .iter_mut()
        .find(|t| t.id == testimonial_id)
        .ok_or_else(|| ReputationError::TestimonialNotFound(testimonial_id.to_string()))?;
    if !testimonial.verified {
        testimonial.verified = true;
        let verified = testimonial.clone();
        store.put_reputation(subject, &state)?;
        info!(%subject, testimonial = testimonial_id, "testimonial verified");
        return Ok(verified);
    }
    Ok(testimonial.clone())
}

/// A community member vouching for a subject. The weight comes from how many
/// vouches the voucher has given across the whole registry.
pub fn vouch<S>(
    store: &S,
    voucher: &ActorId,
    subject: &SubjectId,
    message: String,
    now: Timestamp,
) -> Result<Vouch, ReputationError>
where
    S: IdentityStore + AttestationStore + ?Sized,
{
    require_subject(store, subject)?;
    let mut given = 0usize;
    for identity in store.list_identities()? {
        given += store
            .get_reputation(&identity.id)?
            .vouches
            .iter()
            .filter(|v| &v.voucher == voucher)
            .count();
    }
    let existing = store.get_reputation(subject)?.vouches.len();
    let vouch = Vouch {
        id: format!("vouch-{}", existing + 1),
        voucher: voucher.clone(),
        message,
        timestamp: now,
        weight: voucher_weight(given),
    };
    store.append_attestation(subject, &Attestation::Vouch(vouch.clone()))?;
    info!(%subject, %voucher, weight = vouch.weight, "vouch added");
    Ok(vouch)
}

/// Add to the value the subject has at risk. Returns the new total.
pub fn stake_reputation<S>(store: &S, subject: &SubjectId, amount: u64) -> Result<u64, ReputationError>
where
    S: IdentityStore + AttestationStore + ?Sized,
{
    if amount == 0 {
        return Err(ReputationError::ZeroStake);
    }
    require_subject(store, subject)?;
    let mut state = store.get_reputation(subject)?;
    state.reputation_staked = state.reputation_staked.saturating_add(amount);
    store.put_reputation(subject, &state)?;
    info!(%subject, amount, total = state.reputation_staked, "reputation staked");
    Ok(state.reputation_staked)
}

/// Counts over a subject's community record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityValidationStats {
    pub total_endorsements: usize,
    pub total_testimonials: usize,
    pub verified_testimonials: usize,
    pub total_vouches: usize,
    pub reputation_score: u32,
    pub reputation_staked: u64,
}

impl CommunityValidationStats {
    pub fn from_state(state: &ReputationState) -> Self {
        Self {
            total_endorsements: state.peer_endorsements.len(),
            total_testimonials: state.testimonials.len(),
            verified_testimonials: state.verified_testimonials(),
            total_vouches: state.vouches.len(),
            reputation_score: state.reputation_score,
            reputation_staked: state.reputation_staked,
        }
    }
}

/// The subject's full community record: endorsements, testimonials, vouches.
pub fn community_validation<S>(
    store: &S,
    subject: &SubjectId,
) -> Result<ReputationState, ReputationError>
where
    S: IdentityStore + AttestationStore + ?Sized,
{
    require_subject(store, subject)?;
    Ok(store.get_reputation(subject)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_verified_testimonials() {
        let mut state = ReputationState::default();
        for (id, verified) in [("t1", true), ("t2", false)] {
            state.testimonials.push(Testimonial {
                id: id.into(),
                author_name: "Ann".into(),
                role: String::new(),
                message: String::new(),
                timestamp: Timestamp::new(0),
                verified,
            });
        }
        state.reputation_staked = 40;
        let stats = CommunityValidationStats::from_state(&state);
        assert_eq!((stats.total_testimonials, stats.verified_testimonials), (2, 1));
        assert_eq!(stats.total_endorsements, 0);
        assert_eq!(stats.reputation_staked, 40);
    }

    #[test]
    fn voucher_tiers() {
        let tiers: Vec<u32> = [0, 2, 3, 10, 11, 25, 26, 1_000]
            .into_iter()
            .map(voucher_weight)
            .collect();
        assert_eq!(tiers, vec![1, 1, 2, 2, 3, 3, 5, 5]);
    }
}
