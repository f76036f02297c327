//! Challenge issuance.
//!
//! One open challenge per claim: issuing for a claim first discards any
//! unconsumed challenge stored for it. Consumed challenges are kept as the
//! audit trail of the proof they produced. Callers serialize issuance per
//! subject.

use crate::error::VerificationError;
use crate::formats::{
    self, DEFAULT_PUBLIC_VARIABLE, NONCE_BYTES, TOKEN_BYTES, TOKEN_PREFIX,
};
use registry_crypto::random_hex;
use registry_intake::{check_suspicious_address, clean, FieldKind};
use registry_store::{ChallengeStore, ProofStore};
use registry_types::{
    ChainMethod, ChainType, Challenge, ChallengeId, ClaimKey, OrganizationIdentity, Platform,
    Timestamp, VerificationMethod,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// How a domain is to be proven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainMethod {
    #[default]
    DnsTxtRecord,
    WellKnownFile,
}

/// The caller's choice of chain method. The issuer fills in the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainMethodRequest {
    SignMessage,
    DeploySpecialContract,
    SetPublicVariable { variable_name: Option<String> },
    SpecialTransaction,
}

pub struct ChallengeIssuer {
    ttl_secs: u64,
}

impl ChallengeIssuer {
    pub fn new(ttl_secs: u64) -> Self {
        Self { ttl_secs }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn new_token() -> Result<String, VerificationError> {
        Ok(format!("{TOKEN_PREFIX}{}", random_hex(TOKEN_BYTES)?))
    }

    /// Domain challenge for the subject's claimed domain, or its website host.
    pub fn issue_domain_challenge<S>(
        &self,
        store: &S,
        identity: &OrganizationIdentity,
        method: DomainMethod,
        now: Timestamp,
    ) -> Result<Challenge, VerificationError>
    where
        S: ChallengeStore + ProofStore + ?Sized,
    {
        let raw = identity
            .handles
            .domain
            .as_deref()
            .unwrap_or(&identity.basic_info.website);
        let domain = clean(&FieldKind::Domain, raw)?;
        let method = match method {
            DomainMethod::DnsTxtRecord => VerificationMethod::DnsTxtRecord,
            DomainMethod::WellKnownFile => VerificationMethod::WellKnownFile,
        };
        let claim = ClaimKey::new(identity.id.clone(), Platform::Domain, domain);
        let token = Self::new_token()?;
        self.store_new(store, claim, method, token, None, now)
    }

    /// Profile (GitHub) or public-post (social) challenge for a claimed handle.
    pub fn issue_platform_challenge<S>(
        &self,
        store: &S,
        identity: &OrganizationIdentity,
        platform: Platform,
        now: Timestamp,
    ) -> Result<Challenge, VerificationError>
    where
        S: ChallengeStore + ProofStore + ?Sized,
    {
        let method = match platform {
            Platform::GitHub => VerificationMethod::ProfileField,
            p if p.is_social() => VerificationMethod::PublicPost,
            _ => {
                return Err(VerificationError::MethodMismatch {
                    method: "profile_field/public_post".to_string(),
                    platform,
                })
            }
        };
        let handle = identity
            .handle_for(platform)
            .ok_or_else(|| VerificationError::NotClaimed {
                platform,
                target: String::new(),
            })?
            .to_string();
        let claim = ClaimKey::new(identity.id.clone(), platform, handle.clone());
        let token = Self::new_token()?;
        let required_text = platform
            .is_social()
            .then(|| formats::social_required_text(&handle, &identity.id, &token));
        self.store_new(store, claim, method, token, required_text, now)
    }

    /// Chain challenge for a claimed address or contract.
    pub fn issue_chain_challenge<S>(
        &self,
        store: &S,
        identity: &OrganizationIdentity,
        chain: ChainType,
        address: &str,
        request: ChainMethodRequest,
        now: Timestamp,
    ) -> Result<Challenge, VerificationError>
    where
        S: ChallengeStore + ProofStore + ?Sized,
    {
        let kind = FieldKind::Address(chain);
        let address = registry_intake::sanitize(&kind, address);
        check_suspicious_address(chain, &address)?;
        registry_intake::validate(&kind, &address)?;

        let platform = Platform::Chain(chain);
        if !identity.has_claim(platform, &address) {
            return Err(VerificationError::NotClaimed {
                platform,
                target: address,
            });
        }

        let token = Self::new_token()?;
        let method = match request {
            ChainMethodRequest::SignMessage => ChainMethod::SignMessage {
                message: formats::sign_message_text(&identity.id, &random_hex(NONCE_BYTES)?),
            },
            ChainMethodRequest::DeploySpecialContract => ChainMethod::DeploySpecialContract {
                verification_code: token.clone(),
            },
            ChainMethodRequest::SetPublicVariable { variable_name } => {
                let variable_name = variable_name
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_PUBLIC_VARIABLE.to_string());
                ChainMethod::SetPublicVariable {
                    variable_name,
                    value: token.clone(),
                }
            }
            ChainMethodRequest::SpecialTransaction => ChainMethod::SpecialTransaction {
                transaction_data: token.clone(),
            },
        };
        // The token of a SignMessage challenge is the message itself.
        let token = match &method {
            ChainMethod::SignMessage { message } => message.clone(),
            _ => token,
        };
        let claim = ClaimKey::new(identity.id.clone(), platform, address);
        self.store_new(store, claim, VerificationMethod::Chain(method), token, None, now)
    }

    fn store_new<S>(
        &self,
        store: &S,
        claim: ClaimKey,
        method: VerificationMethod,
        token: String,
        required_text: Option<String>,
        now: Timestamp,
    ) -> Result<Challenge, VerificationError>
    where
        S: ChallengeStore + ProofStore + ?Sized,
    {
        if !method.supports(&claim.platform) {
            return Err(VerificationError::MethodMismatch {
                method: method.name().to_string(),
                platform: claim.platform,
            });
        }

        // A disputed proof still holds its claim until the dispute is resolved.
        let already_held = store
            .proofs_for_subject(&claim.subject)?
            .iter()
            .any(|p| p.is_monitored() && p.claim_key() == claim);
        if already_held {
            return Err(VerificationError::AlreadyVerified {
                platform: claim.platform,
                target: claim.target,
            });
        }

        if let Some(previous) = store.challenge_for_claim(&claim)? {
            if !previous.is_consumed() {
                store.delete_challenge(&previous.id)?;
                info!(
                    subject = %claim.subject,
                    platform = %claim.platform,
                    previous = %previous.id,
                    "previous challenge invalidated"
                );
            }
        }

        let challenge = Challenge {
            id: ChallengeId::new(random_hex(TOKEN_BYTES)?),
            claim,
            method,
            token,
            required_text,
            created_at: now,
            expires_at: now.plus_secs(self.ttl_secs),
            consumed_at: None,
        };
        store.put_challenge(&challenge)?;
        info!(
            subject = %challenge.claim.subject,
            platform = %challenge.claim.platform,
            target = %challenge.claim.target,
            method = challenge.method.name(),
            challenge = %challenge.id,
            "challenge issued"
        );
        Ok(challenge)
    }
}
