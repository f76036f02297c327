//! Proof verification against an open challenge.
//!
//! On success the challenge is consumed and an Active proof is appended. On
//! failure nothing is written: the challenge stays open until it expires so
//! the subject can retry. Claimed identity data is never touched here.

use crate::checks::{CheckOutcome, Prober};
use crate::error::VerificationError;
use crate::formats::{self, VERIFICATION_CODE_KEY};
use registry_crypto::proof_id;
use registry_intake::{clean, validate_secure_url, FieldKind};
use registry_store::{ChallengeStore, ProofStore};
use registry_types::{
    ChainMethod, Challenge, ChallengeId, Platform, ProofLocator, ProofStatus, ProofSubmission,
    Timestamp, VerificationMethod, VerificationProof, VerificationResult,
};
use tracing::{info, warn};

enum Verdict {
    Pass(ProofLocator),
    Fail(String),
}

pub struct ProofVerifier {
    prober: Prober,
}

impl ProofVerifier {
    pub fn new(prober: Prober) -> Self {
        Self { prober }
    }

    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    /// Load the challenge and reject it unless it is the open one for its claim.
    pub fn open_challenge<S>(
        &self,
        store: &S,
        id: &ChallengeId,
        now: Timestamp,
    ) -> Result<Challenge, VerificationError>
    where
        S: ChallengeStore + ?Sized,
    {
        let challenge = store
            .get_challenge(id)?
            .ok_or(VerificationError::ChallengeNotFound)?;
        if challenge.is_consumed() {
            return Err(VerificationError::ChallengeAlreadyConsumed);
        }
        if challenge.is_expired(now) {
            return Err(VerificationError::ChallengeExpired);
        }
        let current = store.challenge_for_claim(&challenge.claim)?;
        if current.map(|c| c.id) != Some(challenge.id.clone()) {
            return Err(VerificationError::ChallengeNotFound);
        }
        Ok(challenge)
    }

    /// Verify `submission` against challenge `id` at `now`.
    pub async fn verify<S>(
        &self,
        store: &S,
        id: &ChallengeId,
        submission: &ProofSubmission,
        now: Timestamp,
    ) -> Result<VerificationResult, VerificationError>
    where
        S: ChallengeStore + ProofStore + ?Sized,
    {
        let mut challenge = self.open_challenge(store, id, now)?;

        let verdict = self.check(&challenge, submission).await;
        let locator = match verdict {
            Verdict::Pass(locator) => locator,
            Verdict::Fail(reason) => {
                info!(
                    subject = %challenge.claim.subject,
                    platform = %challenge.claim.platform,
                    challenge = %challenge.id,
                    reason = %reason,
                    "verification failed"
                );
                return Ok(VerificationResult::failed(reason));
            }
        };

        let claim = &challenge.claim;
        let duplicate = store
            .proofs_for_subject(&claim.subject)?
            .iter()
            .any(|p| p.is_monitored() && &p.claim_key() == claim);
        if duplicate {
            warn!(subject = %claim.subject, platform = %claim.platform, "claim already holds a proof");
            return Err(VerificationError::AlreadyVerified {
                platform: claim.platform,
                target: claim.target.clone(),
            });
        }

        challenge.consumed_at = Some(now);
        store.put_challenge(&challenge)?;

        let proof = VerificationProof {
            id: proof_id(&claim.subject, &claim.platform, &claim.target, now, &challenge.id),
            subject: claim.subject.clone(),
            platform: claim.platform,
            target: claim.target.clone(),
            challenge_id: challenge.id.clone(),
            locator,
            method: challenge.method.clone(),
            verified_at: now,
            status: ProofStatus::Active,
            required_text: challenge.required_text.clone(),
            pending_removal_since: None,
            history: Vec::new(),
        };
        store.append_proof(&proof)?;
        info!(
            subject = %proof.subject,
            platform = %proof.platform,
            target = %proof.target,
            proof = %proof.id,
            "proof verified"
        );
        Ok(VerificationResult::verified(proof.id, now))
    }

    async fn check(&self, challenge: &Challenge, submission: &ProofSubmission) -> Verdict {
        let target = challenge.claim.target.as_str();
        let located = match (&challenge.method, submission) {
            (VerificationMethod::DnsTxtRecord, ProofSubmission::None) => ProofLocator::Url {
                url: formats::dns_query_url(target),
                expected: challenge.token.clone(),
            },
            (VerificationMethod::WellKnownFile, ProofSubmission::None) => ProofLocator::Url {
                url: formats::well_known_url(target),
                expected: challenge.token.clone(),
            },
            (VerificationMethod::ProfileField, ProofSubmission::None) => ProofLocator::Url {
                url: formats::github_org_url(target),
                expected: challenge.token.clone(),
            },
            (VerificationMethod::PublicPost, ProofSubmission::PostUrl(url)) => {
                let url = url.trim();
                let hosts = formats::allowed_post_hosts(&challenge.claim.platform);
                if let Err(e) = validate_secure_url(url, hosts) {
                    return Verdict::Fail(format!("proof URL rejected: {e}"));
                }
                ProofLocator::Url {
                    url: url.to_string(),
                    expected: challenge.expected_text().to_string(),
                }
            }
            (VerificationMethod::Chain(method), submission) => {
                match chain_locator(challenge, method, submission) {
                    Ok(locator) => locator,
                    Err(reason) => return Verdict::Fail(reason),
                }
            }
            _ => {
                return Verdict::Fail(format!(
                    "submission does not match the {} method of this challenge",
                    challenge.method.name()
                ))
            }
        };

        match self.prober.locator(&located).await {
            CheckOutcome::Present => Verdict::Pass(located),
            CheckOutcome::Missing(reason) | CheckOutcome::Transient(reason) => Verdict::Fail(reason),
        }
    }
}

fn chain_locator(
    challenge: &Challenge,
    method: &ChainMethod,
    submission: &ProofSubmission,
) -> Result<ProofLocator, String> {
    let Platform::Chain(chain) = challenge.claim.platform else {
        return Err("chain method on a non-chain claim".to_string());
    };
    let address = challenge.claim.target.clone();
    match (method, submission) {
        (ChainMethod::SignMessage { message }, ProofSubmission::Signature(signature)) => {
            Ok(ProofLocator::Signature {
                chain,
                address,
                message: message.clone(),
                signature: signature.trim().to_string(),
            })
        }
        (
            ChainMethod::DeploySpecialContract { verification_code },
            ProofSubmission::ContractAddress(contract),
        ) => {
            let contract = clean(&FieldKind::Address(chain), contract)
                .map_err(|e| format!("contract address rejected: {e}"))?;
            Ok(ProofLocator::ChainState {
                chain,
                address: contract,
                key: VERIFICATION_CODE_KEY.to_string(),
                expected: verification_code.clone(),
            })
        }
        (ChainMethod::SetPublicVariable { variable_name, value }, ProofSubmission::None) => {
            Ok(ProofLocator::ChainState {
                chain,
                address,
                key: variable_name.clone(),
                expected: value.clone(),
            })
        }
        (
            ChainMethod::SpecialTransaction { transaction_data },
            ProofSubmission::TransactionId(tx),
        ) => {
            let tx = tx.trim();
            if tx.is_empty() {
                return Err("transaction id is required".to_string());
            }
            Ok(ProofLocator::ChainState {
                chain,
                address,
                key: formats::transaction_key(tx),
                expected: transaction_data.clone(),
            })
        }
        _ => Err(format!(
            "submission does not match the {} method of this challenge",
            method.name()
        )),
    }
}
