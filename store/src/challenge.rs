//! Challenge storage trait.

use crate::StoreError;
use registry_types::{Challenge, ChallengeId, ClaimKey};

pub trait ChallengeStore {
    fn get_challenge(&self, id: &ChallengeId) -> Result<Option<Challenge>, StoreError>;

    /// Insert or replace by id. The claim index points at the latest challenge put.
    fn put_challenge(&self, challenge: &Challenge) -> Result<(), StoreError>;

    fn delete_challenge(&self, id: &ChallengeId) -> Result<(), StoreError>;

    /// The most recently stored challenge for a claim, in any state.
    fn challenge_for_claim(&self, claim: &ClaimKey) -> Result<Option<Challenge>, StoreError>;
}
