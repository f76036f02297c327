use registry_store::StoreError;
use registry_types::SubjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("organization {0} not found")]
    SubjectNotFound(SubjectId),

    #[error("an organization cannot endorse itself")]
    SelfEndorsement,

    #[error("{endorser} has already endorsed {subject}")]
    AlreadyEndorsed { endorser: SubjectId, subject: SubjectId },

    #[error("endorser reputation too low: {have} < {need}")]
    EndorserReputationTooLow { have: u32, need: u32 },

    #[error("testimonial {0} not found")]
    TestimonialNotFound(String),

    #[error("stake amount must be positive")]
    ZeroStake,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ReputationError {
    pub(crate) fn from_lookup(subject: &SubjectId, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::SubjectNotFound(subject.clone()),
            other => Self::Store(other),
        }
    }
}
