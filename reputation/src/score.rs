//! Score formulas and the recompute step that persists them.

use crate::error::ReputationError;
use registry_store::{AttestationStore, IdentityStore, ProofStore};
use registry_types::{
    OrganizationStatus, PlatformWeights, ProofStatus, ReputationState, ReputationWeights,
    SubjectId, Timestamp, TrustParams, VerificationProof,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sum of platform weights over Active proofs, capped.
/// Removed and Disputed proofs contribute nothing.
pub fn verification_score<'a>(
    proofs: impl IntoIterator<Item = &'a VerificationProof>,
    weights: &PlatformWeights,
) -> u32 {
    let total = proofs
        .into_iter()
        .filter(|p| p.status == ProofStatus::Active)
        .fold(0u32, |acc, p| acc.saturating_add(weights.weight(&p.platform)));
    total.min(weights.cap)
}

/// `factor * ceil(log10(staked))`, zero when nothing is staked.
pub fn stake_bonus(staked: u64, factor: u32) -> u32 {
    let mut digits = 0u32;
    let mut power = 1u64;
    while power < staked {
        power = power.saturating_mul(10);
        digits += 1;
    }
    digits.saturating_mul(factor)
}

pub fn reputation_score(
    state: &ReputationState,
    verification_score: u32,
    weights: &ReputationWeights,
) -> u32 {
    let unverified = state.testimonials.len() - state.verified_testimonials();
    let parts: [u64; 6] = [
        u64::from(verification_score / weights.verification_divisor.max(1)),
        state.peer_endorsements.len() as u64 * u64::from(weights.per_endorsement),
        state.verified_testimonials() as u64 * u64::from(weights.per_verified_testimonial),
        unverified as u64 * u64::from(weights.per_unverified_testimonial),
        state.total_vouch_weight() * u64::from(weights.per_vouch_weight),
        u64::from(stake_bonus(state.reputation_staked, weights.stake_factor)),
    ];
    let total = parts.iter().fold(0u64, |acc, p| acc.saturating_add(*p));
    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Status from reputation, overridden by Flagged when proofs were lost and
/// little verification remains. Suspended is administrative and sticks.
pub fn derive_status<'a>(
    current: OrganizationStatus,
    reputation: u32,
    verification: u32,
    proofs: impl IntoIterator<Item = &'a VerificationProof>,
    weights: &ReputationWeights,
) -> OrganizationStatus {
    if current == OrganizationStatus::Suspended {
        return current;
    }
    let lost_proof = proofs
        .into_iter()
        .any(|p| matches!(p.status, ProofStatus::Removed | ProofStatus::Disputed));
    if lost_proof && verification < weights.flag_below_verification {
        return OrganizationStatus::Flagged;
    }
    if reputation >= weights.trusted_threshold {
        OrganizationStatus::Trusted
    } else if reputation >= weights.verified_threshold {
        OrganizationStatus::Verified
    } else {
        OrganizationStatus::Pending
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub verification_score: u32,
    pub reputation_score: u32,
    pub status: OrganizationStatus,
}

/// Recompute both scores and the status from stored state and persist them
/// on the identity and reputation records.
pub fn recompute_scores<S>(
    store: &S,
    subject: &SubjectId,
    params: &TrustParams,
    now: Timestamp,
) -> Result<ScoreSnapshot, ReputationError>
where
    S: IdentityStore + ProofStore + AttestationStore + ?Sized,
{
    let mut identity = store
        .get_identity(subject)
        .map_err(|e| ReputationError::from_lookup(subject, e))?;
    let proofs = store.proofs_for_subject(subject)?;
    let mut state = store.get_reputation(subject)?;

    let verification = verification_score(&proofs, &params.weights);
    let reputation = reputation_score(&state, verification, &params.reputation);
    let status = derive_status(
        identity.status,
        reputation,
        verification,
        &proofs,
        &params.reputation,
    );

    let snapshot = ScoreSnapshot {
        verification_score: verification,
        reputation_score: reputation,
        status,
    };
    let changed = identity.verification_score != verification
        || identity.reputation_score != reputation
        || identity.status != status
        || identity.reputation_staked != state.reputation_staked;
    if changed {
        identity.verification_score = verification;
        identity.reputation_score = reputation;
        identity.reputation_staked = state.reputation_staked;
        identity.status = status;
        identity.updated_at = now;
        store.put_identity(&identity)?;
    }
    if state.reputation_score != reputation {
        state.reputation_score = reputation;
        store.put_reputation(subject, &state)?;
    }
    debug!(
        %subject,
        verification,
        reputation,
        status = ?status,
        changed,
        "scores recomputed"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_types::{
        ChainType, Endorsement, Platform, ProofLocator, Testimonial, VerificationMethod, Vouch,
    };

    fn proof(platform: Platform, status: ProofStatus) -> VerificationProof {
        VerificationProof {
            id: format!("{platform}-{status:?}").into(),
            subject: "acme".into(),
            platform,
            target: "t".into(),
            challenge_id: "c".into(),
            locator: ProofLocator::Url {
                url: "https://e.x".into(),
                expected: "x".into(),
            },
            method: VerificationMethod::DnsTxtRecord,
            verified_at: Timestamp::new(0),
            status,
            required_text: None,
            pending_removal_since: None,
            history: Vec::new(),
        }
    }

    #[test]
    fn only_active_proofs_count_and_score_is_capped() {
        let w = PlatformWeights::default();
        let proofs = vec![
            proof(Platform::Domain, ProofStatus::Active),
            proof(Platform::GitHub, ProofStatus::Active),
            proof(Platform::Twitter, ProofStatus::Removed),
            proof(Platform::Discord, ProofStatus::Disputed),
        ];
        assert_eq!(verification_score(&proofs, &w), 55);

        let many: Vec<_> = ChainType::ALL
            .iter()
            .map(|c| proof(Platform::Chain(*c), ProofStatus::Active))
            .chain(proofs.iter().cloned())
            .collect();
        assert_eq!(verification_score(&many, &w), 100);
    }

    #[test]
    fn stake_bonus_uses_decimal_digits() {
        assert_eq!(stake_bonus(0, 2), 0);
        assert_eq!(stake_bonus(1, 2), 0);
        assert_eq!(stake_bonus(10, 2), 2);
        assert_eq!(stake_bonus(11, 2), 4);
        assert_eq!(stake_bonus(1_000, 2), 6);
        assert_eq!(stake_bonus(u64::MAX, 2), 40);
    }

    #[test]
    fn reputation_formula() {
        let mut state = ReputationState::default();
        state.peer_endorsements.push(Endorsement {
            endorser: "other".into(),
            endorser_actor: "bob".into(),
            message: String::new(),
            timestamp: Timestamp::new(0),
        });
        for verified in [true, false] {
            state.testimonials.push(Testimonial {
                id: "t".into(),
                author_name: "Ann".into(),
                role: "CTO".into(),
                message: String::new(),
                timestamp: Timestamp::new(0),
                verified,
            });
        }
        state.vouches.push(Vouch {
            id: "v".into(),
            voucher: "carol".into(),
            message: String::new(),
            timestamp: Timestamp::new(0),
            weight: 2,
        });
        state.reputation_staked = 500;
        // 40/4 + 10 + 5 + 2 + 3*2 + 2*3
        assert_eq!(reputation_score(&state, 40, &ReputationWeights::default()), 39);
    }

    #[test]
    fn status_thresholds_and_flagging() {
        let w = ReputationWeights::default();
        let none: Vec<VerificationProof> = Vec::new();
        let pending = OrganizationStatus::Pending;
        assert_eq!(derive_status(pending, 20, 0, &none, &w), OrganizationStatus::Pending);
        assert_eq!(derive_status(pending, 21, 0, &none, &w), OrganizationStatus::Verified);
        assert_eq!(derive_status(pending, 51, 0, &none, &w), OrganizationStatus::Trusted);

        let lost = vec![proof(Platform::Domain, ProofStatus::Removed)];
        assert_eq!(derive_status(pending, 60, 29, &lost, &w), OrganizationStatus::Flagged);
        assert_eq!(derive_status(pending, 60, 30, &lost, &w), OrganizationStatus::Trusted);
        assert_eq!(
            derive_status(OrganizationStatus::Suspended, 60, 0, &none, &w),
            OrganizationStatus::Suspended
        );
    }
}
