use registry_store::StoreError;
use registry_types::{ProofId, ProofStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("proof {0} not found")]
    ProofNotFound(ProofId),

    #[error("invalid proof transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ProofStatus, to: ProofStatus },

    #[error("claim of proof {0} is already held by another active proof")]
    ClaimAlreadyHeld(ProofId),

    #[error("reporter already has an open report on proof {0}")]
    DuplicateReport(ProofId),

    #[error("alert {0} not found")]
    AlertNotFound(String),

    #[error("alert {0} was already acknowledged")]
    AlertAlreadyAcknowledged(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
