use crate::window::{RateLimit, RateLimiter};
use registry_types::{ActorId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Mutating operations subject to admission control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Challenge,
    Verify,
    Report,
    Attest,
    Claim,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Challenge => "challenge",
            Self::Verify => "verify",
            Self::Report => "report",
            Self::Attest => "attest",
            Self::Claim => "claim",
        })
    }
}

fn default_challenge() -> RateLimit {
    RateLimit::new(5, 300)
}

fn default_verify() -> RateLimit {
    RateLimit::new(5, 300)
}

fn default_report() -> RateLimit {
    RateLimit::new(3, 600)
}

fn default_attest() -> RateLimit {
    RateLimit::new(10, 60)
}

fn default_claim() -> RateLimit {
    RateLimit::new(10, 60)
}

/// One limit per action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    #[serde(default = "default_challenge")]
    pub challenge: RateLimit,
    #[serde(default = "default_verify")]
    pub verify: RateLimit,
    #[serde(default = "default_report")]
    pub report: RateLimit,
    #[serde(default = "default_attest")]
    pub attest: RateLimit,
    #[serde(default = "default_claim")]
    pub claim: RateLimit,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            challenge: default_challenge(),
            verify: default_verify(),
            report: default_report(),
            attest: default_attest(),
            claim: default_claim(),
        }
    }
}

/// Limiters for every action, keyed by actor.
pub struct ActionLimiter {
    challenge: RateLimiter<ActorId>,
    verify: RateLimiter<ActorId>,
    report: RateLimiter<ActorId>,
    attest: RateLimiter<ActorId>,
    claim: RateLimiter<ActorId>,
}

impl ActionLimiter {
    pub fn new(limits: &RateLimits) -> Self {
        Self {
            challenge: RateLimiter::new(limits.challenge),
            verify: RateLimiter::new(limits.verify),
            report: RateLimiter::new(limits.report),
            attest: RateLimiter::new(limits.attest),
            claim: RateLimiter::new(limits.claim),
        }
    }

    fn limiter(&self, action: Action) -> &RateLimiter<ActorId> {
        match action {
            Action::Challenge => &self.challenge,
            Action::Verify => &self.verify,
            Action::Report => &self.report,
            Action::Attest => &self.attest,
            Action::Claim => &self.claim,
        }
    }

    pub fn admit(&self, actor: &ActorId, action: Action, now: Timestamp) -> bool {
        let admitted = self.limiter(action).admit(actor, now);
        if !admitted {
            warn!(
                target: "registry::security",
                actor = %actor,
                %action,
                "rate limit exceeded"
            );
        }
        admitted
    }

    pub fn remaining(&self, actor: &ActorId, action: Action, now: Timestamp) -> u32 {
        self.limiter(action).remaining(actor, now)
    }

    pub fn retry_after(&self, actor: &ActorId, action: Action, now: Timestamp) -> u64 {
        self.limiter(action).retry_after(actor, now)
    }

    /// Drop idle windows across all actions.
    pub fn purge_idle(&self, now: Timestamp) -> usize {
        [
            Action::Challenge,
            Action::Verify,
            Action::Report,
            Action::Attest,
            Action::Claim,
        ]
        .into_iter()
        .map(|a| self.limiter(a).purge_idle(now))
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_have_separate_budgets() {
        let limiter = ActionLimiter::new(&RateLimits::default());
        let alice = ActorId::from("alice");
        let now = Timestamp::new(10);
        for _ in 0..3 {
            assert!(limiter.admit(&alice, Action::Report, now));
        }
        assert!(!limiter.admit(&alice, Action::Report, now));
        assert!(limiter.admit(&alice, Action::Verify, now));
        assert_eq!(limiter.remaining(&alice, Action::Verify, now), 4);
    }

    #[test]
    fn retry_hint_counts_down() {
        let limiter = ActionLimiter::new(&RateLimits::default());
        let alice = ActorId::from("alice");
        for _ in 0..3 {
            limiter.admit(&alice, Action::Report, Timestamp::new(100));
        }
        assert_eq!(limiter.retry_after(&alice, Action::Report, Timestamp::new(400)), 300);
    }
}
