//! Dispute storage trait.

use crate::StoreError;
use registry_types::{Dispute, ProofId};

pub trait DisputeStore {
    fn append_dispute(&self, dispute: &Dispute) -> Result<(), StoreError>;

    fn update_dispute(&self, dispute: &Dispute) -> Result<(), StoreError>;

    fn disputes_for_proof(&self, proof: &ProofId) -> Result<Vec<Dispute>, StoreError>;
}
