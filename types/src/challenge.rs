//! Challenges: time-boxed, single-use tokens that prove a claim.

use crate::ids::{ChallengeId, SubjectId};
use crate::platform::Platform;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Identifies one claim of one subject. At most one open challenge exists per key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClaimKey {
    pub subject: SubjectId,
    pub platform: Platform,
    /// Domain, organization, handle or chain address/contract.
    pub target: String,
}

impl ClaimKey {
    pub fn new(subject: SubjectId, platform: Platform, target: impl Into<String>) -> Self {
        Self {
            subject,
            platform,
            target: target.into(),
        }
    }
}

/// How an on-chain claim is proven. Each variant carries only what its check needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainMethod {
    /// Sign `message` with the key behind the claimed address.
    SignMessage { message: String },
    /// Deploy a contract whose `verification_code` entry equals this value.
    DeploySpecialContract { verification_code: String },
    /// Set `variable_name` on the claimed contract to `value`.
    SetPublicVariable { variable_name: String, value: String },
    /// Send a transaction from the claimed address carrying `transaction_data`.
    SpecialTransaction { transaction_data: String },
}

impl ChainMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SignMessage { .. } => "sign_message",
            Self::DeploySpecialContract { .. } => "deploy_special_contract",
            Self::SetPublicVariable { .. } => "set_public_variable",
            Self::SpecialTransaction { .. } => "special_transaction",
        }
    }
}

/// The method chosen at issuance. The verifier dispatches on this, never on the submission shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationMethod {
    DnsTxtRecord,
    WellKnownFile,
    /// Token placed in a public profile field (GitHub organization description).
    ProfileField,
    /// Required text published in a public post on a social platform.
    PublicPost,
    Chain(ChainMethod),
}

impl VerificationMethod {
    /// Whether this method can prove a claim on `platform`.
    pub fn supports(&self, platform: &Platform) -> bool {
        match (self, platform) {
            (Self::DnsTxtRecord | Self::WellKnownFile, Platform::Domain) => true,
            (Self::ProfileField, Platform::GitHub) => true,
            (Self::PublicPost, p) => p.is_social(),
            (Self::Chain(_), Platform::Chain(_)) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DnsTxtRecord => "dns_txt_record",
            Self::WellKnownFile => "well_known_file",
            Self::ProfileField => "profile_field",
            Self::PublicPost => "public_post",
            Self::Chain(m) => m.name(),
        }
    }
}

/// What the subject hands back when asking for verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofSubmission {
    /// Nothing beyond the challenge id: the verifier looks the token up itself.
    None,
    /// Hex-encoded signature over the challenge message.
    Signature(String),
    ContractAddress(String),
    TransactionId(String),
    PostUrl(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub claim: ClaimKey,
    pub method: VerificationMethod,
    /// Opaque token, or the message to sign for chain challenges.
    pub token: String,
    /// Exact text the subject must publish, when the method needs more than the token.
    pub required_text: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
}

impl Challenge {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Neither expired nor consumed.
    pub fn is_open(&self, now: Timestamp) -> bool {
        !self.is_consumed() && !self.is_expired(now)
    }

    /// The text the verifier looks for in fetched content.
    pub fn expected_text(&self) -> &str {
        self.required_text.as_deref().unwrap_or(&self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ChainType;

    fn challenge(expires_at: u64) -> Challenge {
        Challenge {
            id: "c1".into(),
            claim: ClaimKey::new("org".into(), Platform::Domain, "example.com"),
            method: VerificationMethod::DnsTxtRecord,
            token: "tok".into(),
            required_text: None,
            created_at: Timestamp::new(0),
            expires_at: Timestamp::new(expires_at),
            consumed_at: None,
        }
    }

    #[test]
    fn open_until_expiry_instant() {
        let c = challenge(100);
        assert!(c.is_open(Timestamp::new(99)));
        assert!(!c.is_open(Timestamp::new(100)));
    }

    #[test]
    fn consumed_is_never_open() {
        let mut c = challenge(100);
        c.consumed_at = Some(Timestamp::new(5));
        assert!(!c.is_open(Timestamp::new(6)));
    }

    #[test]
    fn method_platform_compatibility() {
        let sign = VerificationMethod::Chain(ChainMethod::SignMessage {
            message: "m".into(),
        });
        assert!(sign.supports(&Platform::Chain(ChainType::Ethereum)));
        assert!(!sign.supports(&Platform::Domain));
        assert!(VerificationMethod::PublicPost.supports(&Platform::Telegram));
        assert!(!VerificationMethod::PublicPost.supports(&Platform::GitHub));
        assert!(!VerificationMethod::ProfileField.supports(&Platform::Domain));
    }
}
