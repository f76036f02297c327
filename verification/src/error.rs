use registry_crypto::CryptoError;
use registry_intake::IntakeError;
use registry_store::StoreError;
use registry_types::Platform;
use thiserror::Error;

/// Reasons an issuance or verification call cannot proceed. A failed check
/// is not an error: it is a `VerificationResult` with `success == false`.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("invalid claim target: {0}")]
    InvalidTarget(#[from] IntakeError),

    #[error("no claim for {target} on {platform}")]
    NotClaimed { platform: Platform, target: String },

    #[error("method {method} cannot prove a claim on {platform}")]
    MethodMismatch { method: String, platform: Platform },

    #[error("challenge not found")]
    ChallengeNotFound,

    #[error("challenge expired")]
    ChallengeExpired,

    #[error("challenge already consumed")]
    ChallengeAlreadyConsumed,

    #[error("{platform} claim {target} already has an active proof")]
    AlreadyVerified { platform: Platform, target: String },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
