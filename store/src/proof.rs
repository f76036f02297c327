//! Verification proof storage trait. Proofs are appended and updated, never deleted.

use crate::StoreError;
use registry_types::{ProofId, SubjectId, VerificationProof};

pub trait ProofStore {
    /// Fails with `Duplicate` if a proof with the same id exists.
    fn append_proof(&self, proof: &VerificationProof) -> Result<(), StoreError>;

    /// Fails with `NotFound` if the proof was never appended.
    fn update_proof(&self, proof: &VerificationProof) -> Result<(), StoreError>;

    fn get_proof(&self, id: &ProofId) -> Result<VerificationProof, StoreError>;

    /// All proofs of a subject in append order.
    fn proofs_for_subject(&self, subject: &SubjectId) -> Result<Vec<VerificationProof>, StoreError>;

    /// Every proof in the store.
    fn list_proofs(&self) -> Result<Vec<VerificationProof>, StoreError>;

    /// Active and Disputed proofs, the recheck sweep's input.
    fn monitored_proofs(&self) -> Result<Vec<VerificationProof>, StoreError> {
        Ok(self
            .list_proofs()?
            .into_iter()
            .filter(VerificationProof::is_monitored)
            .collect())
    }
}
