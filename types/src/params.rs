//! Tunable trust parameters.
//!
//! Weight and grace tables are configuration, not code: the state machine and
//! the score engine read them through these structs only.

use crate::platform::Platform;
use serde::{Deserialize, Serialize};

const DAY_SECS: u64 = 86_400;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustParams {
    pub weights: PlatformWeights,
    pub grace: GracePeriods,
    pub reputation: ReputationWeights,
}

/// Points each Active proof contributes to the verification score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformWeights {
    pub domain: u32,
    pub github: u32,
    pub twitter: u32,
    pub discord: u32,
    pub telegram: u32,
    /// Per on-chain proof, whatever the chain.
    pub chain: u32,
    pub cap: u32,
}

impl Default for PlatformWeights {
    fn default() -> Self {
        Self {
            domain: 30,
            github: 25,
            twitter: 15,
            discord: 10,
            telegram: 10,
            chain: 10,
            cap: 100,
        }
    }
}

impl PlatformWeights {
    pub fn weight(&self, platform: &Platform) -> u32 {
        match platform {
            Platform::Domain => self.domain,
            Platform::GitHub => self.github,
            Platform::Twitter => self.twitter,
            Platform::Discord => self.discord,
            Platform::Telegram => self.telegram,
            Platform::Chain(_) => self.chain,
        }
    }
}

/// Seconds a failing proof is tolerated before removal, per platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GracePeriods {
    pub domain_secs: u64,
    pub github_secs: u64,
    pub twitter_secs: u64,
    pub discord_secs: u64,
    pub telegram_secs: u64,
    pub chain_secs: u64,
}

impl Default for GracePeriods {
    fn default() -> Self {
        Self {
            domain_secs: 7 * DAY_SECS,
            github_secs: 2 * DAY_SECS,
            twitter_secs: 3 * DAY_SECS,
            discord_secs: 3 * DAY_SECS,
            telegram_secs: 3 * DAY_SECS,
            chain_secs: 0,
        }
    }
}

impl GracePeriods {
    pub fn for_platform(&self, platform: &Platform) -> u64 {
        match platform {
            Platform::Domain => self.domain_secs,
            Platform::GitHub => self.github_secs,
            Platform::Twitter => self.twitter_secs,
            Platform::Discord => self.discord_secs,
            Platform::Telegram => self.telegram_secs,
            Platform::Chain(_) => self.chain_secs,
        }
    }
}

/// Reputation formula coefficients and status thresholds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationWeights {
    /// The verification score is divided by this before being added.
    pub verification_divisor: u32,
    pub per_endorsement: u32,
    pub per_verified_testimonial: u32,
    pub per_unverified_testimonial: u32,
    /// Multiplies the summed vouch weights.
    pub per_vouch_weight: u32,
    /// Multiplies ceil(log10(staked)).
    pub stake_factor: u32,
    /// Reputation at or above which an organization is Verified.
    pub verified_threshold: u32,
    /// Reputation at or above which an organization is Trusted.
    pub trusted_threshold: u32,
    /// Flagged applies only below this verification score.
    pub flag_below_verification: u32,
    /// Minimum reputation for an organization to endorse another.
    pub min_endorser_reputation: u32,
}

impl Default for ReputationWeights {
    fn default() -> Self {
        Self {
            verification_divisor: 4,
            per_endorsement: 10,
            per_verified_testimonial: 5,
            per_unverified_testimonial: 2,
            per_vouch_weight: 3,
            stake_factor: 2,
            verified_threshold: 21,
            trusted_threshold: 51,
            flag_below_verification: 30,
            min_endorser_reputation: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ChainType;

    #[test]
    fn domain_outweighs_github_outweighs_social() {
        let w = PlatformWeights::default();
        assert!(w.weight(&Platform::Domain) > w.weight(&Platform::GitHub));
        assert!(w.weight(&Platform::GitHub) > w.weight(&Platform::Twitter));
        assert_eq!(w.weight(&Platform::Chain(ChainType::Ton)), 10);
    }

    #[test]
    fn chain_grace_is_zero_and_domain_longest() {
        let g = GracePeriods::default();
        assert_eq!(g.for_platform(&Platform::Chain(ChainType::Bitcoin)), 0);
        assert!(g.for_platform(&Platform::Domain) > g.for_platform(&Platform::Twitter));
    }

    #[test]
    fn partial_toml_like_json_keeps_defaults() {
        let params: TrustParams = serde_json::from_str(r#"{"weights":{"domain":40}}"#).unwrap();
        assert_eq!(params.weights.domain, 40);
        assert_eq!(params.weights.github, 25);
        assert_eq!(params.grace, GracePeriods::default());
    }
}
