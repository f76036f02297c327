//! Organization record storage trait.

use crate::StoreError;
use registry_types::{OrganizationIdentity, SubjectId};

pub trait IdentityStore {
    /// Fails with `NotFound` when the subject does not exist.
    fn get_identity(&self, id: &SubjectId) -> Result<OrganizationIdentity, StoreError>;

    /// Insert or replace.
    fn put_identity(&self, identity: &OrganizationIdentity) -> Result<(), StoreError>;

    fn identity_exists(&self, id: &SubjectId) -> Result<bool, StoreError>;

    fn list_identities(&self) -> Result<Vec<OrganizationIdentity>, StoreError>;
}
