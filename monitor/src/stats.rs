use registry_types::{ProofStatus, VerificationProof};
use serde::{Deserialize, Serialize};

/// Counts over a set of proofs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringStats {
    pub total: usize,
    /// Active plus Disputed.
    pub monitored: usize,
    pub active: usize,
    pub removed: usize,
    pub disputed: usize,
    pub pending_removal: usize,
}

impl MonitoringStats {
    pub fn collect<'a>(proofs: impl IntoIterator<Item = &'a VerificationProof>) -> Self {
        let mut stats = Self::default();
        for proof in proofs {
            stats.total += 1;
            match proof.status {
                ProofStatus::Active => stats.active += 1,
                ProofStatus::Removed => stats.removed += 1,
                ProofStatus::Disputed => stats.disputed += 1,
            }
            if proof.is_monitored() {
                stats.monitored += 1;
                if proof.is_pending_removal() {
                    stats.pending_removal += 1;
                }
            }
        }
        stats
    }
}
