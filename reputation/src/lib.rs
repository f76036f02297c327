//! Trust scores.
//!
//! Two numbers per organization:
//! - **Verification score**: weighted sum over currently Active proofs, capped.
//! - **Reputation score**: derived from the verification score, community
//!   attestations and staked value.
//!
//! Both are recomputed from stored state, never edited by hand. The weights
//! live in [`registry_types::TrustParams`] so they can be tuned from config.

pub mod community;
pub mod error;
pub mod fraud;
pub mod leaderboard;
pub mod score;

pub use community::{
    add_testimonial, community_validation, endorse, stake_reputation, verify_testimonial, vouch,
    voucher_weight, CommunityValidationStats,
};
pub use error::ReputationError;
pub use fraud::{detect_fraud_signals, FraudSignal};
pub use leaderboard::{leaderboard, organizations_by_reputation, LeaderboardEntry};
pub use score::{
    derive_status, recompute_scores, reputation_score, stake_bonus, verification_score,
    ScoreSnapshot,
};
