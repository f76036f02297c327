//! Abstract repository traits for the registry.
//!
//! Every storage backend implements these traits; the engine depends only on
//! them. Implementations must give read-your-writes consistency per key.

pub mod alert;
pub mod attestation;
pub mod challenge;
pub mod dispute;
pub mod error;
pub mod identity;
pub mod proof;

pub use alert::AlertStore;
pub use attestation::AttestationStore;
pub use challenge::ChallengeStore;
pub use dispute::DisputeStore;
pub use error::StoreError;
pub use identity::IdentityStore;
pub use proof::ProofStore;

/// Everything the engine persists, behind one handle.
pub trait RegistryStore:
    IdentityStore
    + ChallengeStore
    + ProofStore
    + AttestationStore
    + DisputeStore
    + AlertStore
    + Send
    + Sync
{
}

impl<T> RegistryStore for T where
    T: IdentityStore
        + ChallengeStore
        + ProofStore
        + AttestationStore
        + DisputeStore
        + AlertStore
        + Send
        + Sync
{
}
