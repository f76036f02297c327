//! Read-only directory queries over registered organizations.

use crate::engine::RegistryEngine;
use crate::error::EngineError;
use registry_store::RegistryStore;
use registry_types::{OrganizationIdentity, OrganizationStatus, SubjectId, Timestamp};
use serde::{Deserialize, Serialize};

/// Default page size when `limit` is not given.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Maximum page size.
pub const MAX_PAGE_SIZE: usize = 500;

/// All criteria that are set must match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub status: Option<OrganizationStatus>,
    /// Matches when the organization lists any of these.
    pub focus_areas: Option<Vec<String>>,
    pub min_verification_score: Option<u32>,
    pub has_github: Option<bool>,
    /// Any declared on-chain address.
    pub has_contracts: Option<bool>,
}

impl SearchFilters {
    pub fn matches(&self, org: &OrganizationIdentity) -> bool {
        if self.status.is_some_and(|s| s != org.status) {
            return false;
        }
        if let Some(areas) = &self.focus_areas {
            let listed = &org.basic_info.focus_areas;
            if !areas.iter().any(|a| listed.iter().any(|l| l.eq_ignore_ascii_case(a))) {
                return false;
            }
        }
        if self
            .min_verification_score
            .is_some_and(|min| org.verification_score < min)
        {
            return false;
        }
        if self
            .has_github
            .is_some_and(|want| want != org.handles.github_org.is_some())
        {
            return false;
        }
        if self
            .has_contracts
            .is_some_and(|want| want != !org.chains.is_empty())
        {
            return false;
        }
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub offset: usize,
    pub limit: Option<usize>,
    #[serde(default)]
    pub filters: SearchFilters,
}

impl ListRequest {
    /// Page size clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub subject: SubjectId,
    pub name: String,
    pub description: String,
    pub website: String,
    pub focus_areas: Vec<String>,
    pub status: OrganizationStatus,
    pub verification_score: u32,
    pub reputation_score: u32,
    pub created_at: Timestamp,
}

impl From<OrganizationIdentity> for OrganizationSummary {
    fn from(org: OrganizationIdentity) -> Self {
        Self {
            subject: org.id,
            name: org.basic_info.name,
            description: org.basic_info.description,
            website: org.basic_info.website,
            focus_areas: org.basic_info.focus_areas,
            status: org.status,
            verification_score: org.verification_score,
            reputation_score: org.reputation_score,
            created_at: org.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPage {
    pub organizations: Vec<OrganizationSummary>,
    /// Offset of the next page, absent on the last one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<usize>,
    /// Matches across all pages.
    pub total: usize,
}

/// Organization counts by status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStatistics {
    pub total: usize,
    pub pending: usize,
    pub verified: usize,
    pub trusted: usize,
    pub flagged: usize,
    pub suspended: usize,
}

impl RegistryStatistics {
    pub fn collect<'a>(orgs: impl IntoIterator<Item = &'a OrganizationIdentity>) -> Self {
        let mut stats = Self::default();
        for org in orgs {
            stats.total += 1;
            match org.status {
                OrganizationStatus::Pending => stats.pending += 1,
                OrganizationStatus::Verified => stats.verified += 1,
                OrganizationStatus::Trusted => stats.trusted += 1,
                OrganizationStatus::Flagged => stats.flagged += 1,
                OrganizationStatus::Suspended => stats.suspended += 1,
            }
        }
        stats
    }
}

/// Case-insensitive substring match on name, description or a focus area.
fn matches_query(org: &OrganizationIdentity, query: &str) -> bool {
    let info = &org.basic_info;
    info.name.to_lowercase().contains(query)
        || info.description.to_lowercase().contains(query)
        || info
            .focus_areas
            .iter()
            .any(|a| a.to_lowercase().contains(query))
}

impl<S: RegistryStore + 'static> RegistryEngine<S> {
    /// Organizations whose name, description or focus areas contain `query`.
    /// A blank query matches nothing.
    pub fn search_organizations(&self, query: &str) -> Result<Vec<OrganizationSummary>, EngineError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .list_identities()?
            .into_iter()
            .filter(|org| matches_query(org, &query))
            .map(OrganizationSummary::from)
            .collect())
    }

    /// One page of filtered organizations, highest verification score first,
    /// newest first among equals.
    pub fn list_organizations(&self, request: &ListRequest) -> Result<OrganizationPage, EngineError> {
        let mut matching: Vec<OrganizationIdentity> = self
            .store
            .list_identities()?
            .into_iter()
            .filter(|org| request.filters.matches(org))
            .collect();
        matching.sort_by(|a, b| {
            b.verification_score
                .cmp(&a.verification_score)
                .then(b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = matching.len();
        let limit = request.effective_limit();
        let organizations: Vec<OrganizationSummary> = matching
            .into_iter()
            .skip(request.offset)
            .take(limit)
            .map(OrganizationSummary::from)
            .collect();
        let end = request.offset.saturating_add(organizations.len());
        Ok(OrganizationPage {
            next_offset: (end < total).then_some(end),
            organizations,
            total,
        })
    }

    pub fn registry_statistics(&self) -> Result<RegistryStatistics, EngineError> {
        Ok(RegistryStatistics::collect(&self.store.list_identities()?))
    }
}
