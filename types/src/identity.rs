//! The organization record: the subject of verification.

use crate::ids::{ActorId, SubjectId};
use crate::platform::{ChainType, Platform};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub name: String,
    pub description: String,
    pub website: String,
    pub founding_date: String,
    pub team_size: u32,
    /// DeFi, NFTs, Infrastructure, ...
    pub focus_areas: Vec<String>,
}

/// Claimed handles on web platforms. Nothing here is trusted until a proof exists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHandles {
    pub domain: Option<String>,
    pub github_org: Option<String>,
    pub twitter: Option<String>,
    pub discord: Option<String>,
    pub telegram: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainClaim {
    pub chain: ChainType,
    pub address: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganizationStatus {
    /// Initial registration.
    #[default]
    Pending,
    /// Basic verification complete.
    Verified,
    /// High reputation, community validated.
    Trusted,
    /// Proofs removed or disputed.
    Flagged,
    /// Administrative action.
    Suspended,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationIdentity {
    pub id: SubjectId,
    pub owner: ActorId,
    pub basic_info: BasicInfo,
    pub handles: PlatformHandles,
    pub chains: Vec<ChainClaim>,
    /// Weighted sum over active proofs, capped at 100.
    pub verification_score: u32,
    pub reputation_score: u32,
    pub reputation_staked: u64,
    pub status: OrganizationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrganizationIdentity {
    pub fn new(id: SubjectId, owner: ActorId, now: Timestamp) -> Self {
        Self {
            id,
            owner,
            basic_info: BasicInfo::default(),
            handles: PlatformHandles::default(),
            chains: Vec::new(),
            verification_score: 0,
            reputation_score: 0,
            reputation_staked: 0,
            status: OrganizationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// The claimed target for a platform, when there is exactly one slot for it.
    pub fn handle_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Domain => self.handles.domain.as_deref(),
            Platform::GitHub => self.handles.github_org.as_deref(),
            Platform::Twitter => self.handles.twitter.as_deref(),
            Platform::Discord => self.handles.discord.as_deref(),
            Platform::Telegram => self.handles.telegram.as_deref(),
            Platform::Chain(_) => None,
        }
    }

    /// Whether the organization has claimed `target` on `platform`.
    pub fn has_claim(&self, platform: Platform, target: &str) -> bool {
        match platform {
            Platform::Chain(chain) => self
                .chains
                .iter()
                .any(|c| c.chain == chain && c.address == target),
            other => self.handle_for(other) == Some(target),
        }
    }

    pub fn is_owned_by(&self, actor: &ActorId) -> bool {
        &self.owner == actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_claim_checks_chain_and_handles() {
        let mut org = OrganizationIdentity::new("org-1".into(), "alice".into(), Timestamp::new(1));
        org.handles.domain = Some("example.com".into());
        org.chains.push(ChainClaim {
            chain: ChainType::Ethereum,
            address: "0xabc".into(),
        });

        assert!(org.has_claim(Platform::Domain, "example.com"));
        assert!(!org.has_claim(Platform::Domain, "other.com"));
        assert!(org.has_claim(Platform::Chain(ChainType::Ethereum), "0xabc"));
        assert!(!org.has_claim(Platform::Chain(ChainType::Polygon), "0xabc"));
    }
}
