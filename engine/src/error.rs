//! Engine errors and their presentation-layer shape.
//!
//! Every failure leaves the engine as an [`ApiError`] with a stable
//! [`ErrorKind`]. Storage faults and broken invariants become `Internal` with
//! a generic message; their detail only goes to the log.

use registry_crypto::CryptoError;
use registry_intake::{FieldErrors, IntakeError};
use registry_limiter::Action;
use registry_monitor::MonitorError;
use registry_reputation::ReputationError;
use registry_store::StoreError;
use registry_utils::format_duration;
use registry_verification::VerificationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("rate limited on {action}; retry in {retry_after_secs}s")]
    RateLimited {
        action: Action,
        retry_after_secs: u64,
        remaining: u32,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("actor is not allowed to {0}")]
    Unauthorized(String),

    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("reputation error: {0}")]
    Reputation(#[from] ReputationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl EngineError {
    /// A single-field validation failure.
    pub fn field(path: &str, err: IntakeError) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(path.to_string(), err.to_string());
        Self::Validation(errors)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Verification(e) => match e {
                VerificationError::InvalidTarget(_)
                | VerificationError::NotClaimed { .. }
                | VerificationError::MethodMismatch { .. } => ErrorKind::Validation,
                VerificationError::ChallengeNotFound => ErrorKind::ChallengeNotFound,
                VerificationError::ChallengeExpired => ErrorKind::ChallengeExpired,
                VerificationError::ChallengeAlreadyConsumed => ErrorKind::ChallengeAlreadyConsumed,
                VerificationError::AlreadyVerified { .. } => ErrorKind::Conflict,
                VerificationError::Store(_) | VerificationError::Crypto(_) => ErrorKind::Internal,
            },
            Self::Monitor(e) => match e {
                MonitorError::ProofNotFound(_) | MonitorError::AlertNotFound(_) => {
                    ErrorKind::NotFound
                }
                MonitorError::InvalidTransition { .. }
                | MonitorError::ClaimAlreadyHeld(_)
                | MonitorError::AlertAlreadyAcknowledged(_)
                | MonitorError::DuplicateReport(_) => ErrorKind::Conflict,
                MonitorError::Store(_) => ErrorKind::Internal,
            },
            Self::Reputation(e) => match e {
                ReputationError::SubjectNotFound(_) | ReputationError::TestimonialNotFound(_) => {
                    ErrorKind::NotFound
                }
                ReputationError::SelfEndorsement | ReputationError::AlreadyEndorsed { .. } => {
                    ErrorKind::Conflict
                }
                ReputationError::EndorserReputationTooLow { .. } => ErrorKind::Unauthorized,
                ReputationError::ZeroStake => ErrorKind::Validation,
                ReputationError::Store(_) => ErrorKind::Internal,
            },
            Self::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            Self::Store(_) | Self::Crypto(_) | Self::Config(_) | Self::Metrics(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// The presentation-layer form. Internal detail is logged, not returned.
    pub fn to_api(&self) -> ApiError {
        let kind = self.kind();
        if kind == ErrorKind::Internal {
            error!(error = %self, "internal engine error");
            return ApiError::new(kind, "internal error");
        }

        let mut api = ApiError::new(kind, self.to_string());
        match self {
            Self::Validation(fields) => {
                api.message = "one or more fields are invalid".to_string();
                api.field_errors = fields.clone();
            }
            Self::Verification(VerificationError::InvalidTarget(e)) => {
                api.field_errors.insert("target".to_string(), e.to_string());
            }
            Self::RateLimited {
                action,
                retry_after_secs,
                remaining,
            } => {
                api.message = format!(
                    "too many {action} attempts; try again in {}",
                    format_duration(*retry_after_secs)
                );
                api.retry_hint = Some(RetryHint {
                    retry_after_secs: *retry_after_secs,
                    remaining_attempts: *remaining,
                });
            }
            _ => {}
        }
        api
    }
}

/// Stable, machine-readable error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    RateLimited,
    ChallengeNotFound,
    ChallengeExpired,
    ChallengeAlreadyConsumed,
    VerificationFailed,
    NotFound,
    Unauthorized,
    Conflict,
    Internal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryHint {
    pub retry_after_secs: u64,
    pub remaining_attempts: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_hint: Option<RetryHint>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: FieldErrors::new(),
            retry_hint: None,
        }
    }
}
