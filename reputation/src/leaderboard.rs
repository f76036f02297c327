use crate::error::ReputationError;
use registry_store::IdentityStore;
use registry_types::{OrganizationStatus, SubjectId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub subject: SubjectId,
    pub name: String,
    pub reputation_score: u32,
    pub verification_score: u32,
    pub status: OrganizationStatus,
}

/// Top `limit` organizations by reputation, then verification score, then id.
/// Suspended organizations are not listed.
pub fn leaderboard<S>(store: &S, limit: usize) -> Result<Vec<LeaderboardEntry>, ReputationError>
where
    S: IdentityStore + ?Sized,
{
    ranked(store, 0, limit)
}

/// Organizations with at least `min_score` reputation, best first.
pub fn organizations_by_reputation<S>(
    store: &S,
    min_score: u32,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, ReputationError>
where
    S: IdentityStore + ?Sized,
{
    ranked(store, min_score, limit)
}

fn ranked<S>(
    store: &S,
    min_score: u32,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, ReputationError>
where
    S: IdentityStore + ?Sized,
{
    let mut entries: Vec<LeaderboardEntry> = store
        .list_identities()?
        .into_iter()
        .filter(|i| i.status != OrganizationStatus::Suspended && i.reputation_score >= min_score)
        .map(|i| LeaderboardEntry {
            subject: i.id,
            name: i.basic_info.name,
            reputation_score: i.reputation_score,
            verification_score: i.verification_score,
            status: i.status,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.reputation_score
            .cmp(&a.reputation_score)
            .then(b.verification_score.cmp(&a.verification_score))
            .then_with(|| a.subject.cmp(&b.subject))
    });
    entries.truncate(limit);
    Ok(entries)
}
