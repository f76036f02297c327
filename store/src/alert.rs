//! Community alert storage trait.

use crate::StoreError;
use registry_types::{CommunityAlert, SubjectId};

pub trait AlertStore {
    /// Fails with `Duplicate` if an alert with the same id exists.
    fn append_alert(&self, alert: &CommunityAlert) -> Result<(), StoreError>;

    /// Fails with `NotFound` if the alert was never appended.
    fn update_alert(&self, alert: &CommunityAlert) -> Result<(), StoreError>;

    fn get_alert(&self, id: &str) -> Result<CommunityAlert, StoreError>;

    /// Alerts raised against one subject, oldest first.
    fn alerts_for_subject(&self, subject: &SubjectId) -> Result<Vec<CommunityAlert>, StoreError>;

    fn list_alerts(&self) -> Result<Vec<CommunityAlert>, StoreError>;
}
