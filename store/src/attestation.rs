//! Community attestation storage trait.

use crate::StoreError;
use registry_types::{Attestation, ReputationState, SubjectId};

pub trait AttestationStore {
    /// A subject with no attestations yet has the default (empty) state.
    fn get_reputation(&self, subject: &SubjectId) -> Result<ReputationState, StoreError>;

    fn append_attestation(&self, subject: &SubjectId, attestation: &Attestation) -> Result<(), StoreError>;

    /// Replace the whole state. Used for derived fields, stake and testimonial verification.
    fn put_reputation(&self, subject: &SubjectId, state: &ReputationState) -> Result<(), StoreError>;
}
