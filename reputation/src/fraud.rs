//! Heuristic fraud signals. Reported for review, never enforced automatically.

use crate::error::ReputationError;
use registry_store::{AttestationStore, IdentityStore};
use registry_types::{SubjectId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

const BURST_WINDOW_SECS: u64 = 3_600;
const BURST_MAX_ENDORSEMENTS: usize = 5;
const MAX_SHARED_AUTHOR_SUBJECTS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FraudSignal {
    /// More endorsements inside one hour than an organic campaign produces.
    EndorsementBurst { count: usize, window_start: Timestamp },
    /// The subject and `other` endorse each other.
    MutualEndorsement { other: SubjectId },
    /// The same testimonial author appears on several other subjects.
    SharedTestimonialAuthor { author: String, other_subjects: usize },
}

pub fn detect_fraud_signals<S>(
    store: &S,
    subject: &SubjectId,
) -> Result<Vec<FraudSignal>, ReputationError>
where
    S: IdentityStore + AttestationStore + ?Sized,
{
    if !store.identity_exists(subject)? {
        return Err(ReputationError::SubjectNotFound(subject.clone()));
    }
    let state = store.get_reputation(subject)?;
    let mut signals = Vec::new();

    let mut times: Vec<Timestamp> = state.peer_endorsements.iter().map(|e| e.timestamp).collect();
    times.sort();
    let mut start = 0;
    let mut worst: Option<(usize, Timestamp)> = None;
    for end in 0..times.len() {
        while times[start].elapsed_since(times[end]) >= BURST_WINDOW_SECS {
            start += 1;
        }
        let count = end - start + 1;
        if count > BURST_MAX_ENDORSEMENTS && worst.map_or(true, |(c, _)| count > c) {
            worst = Some((count, times[start]));
        }
    }
    if let Some((count, window_start)) = worst {
        signals.push(FraudSignal::EndorsementBurst {
            count,
            window_start,
        });
    }

    let endorsers: BTreeSet<&SubjectId> =
        state.peer_endorsements.iter().map(|e| &e.endorser).collect();
    for endorser in endorsers {
        if store.get_reputation(endorser)?.has_endorsement_from(subject) {
            signals.push(FraudSignal::MutualEndorsement {
                other: endorser.clone(),
            });
        }
    }

    let authors: BTreeSet<String> = state
        .testimonials
        .iter()
        .map(|t| t.author_name.to_lowercase())
        .collect();
    if !authors.is_empty() {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for other in store.list_identities()? {
            if &other.id == subject {
                continue;
            }
            let other_state = store.get_reputation(&other.id)?;
            let other_authors: BTreeSet<String> = other_state
                .testimonials
                .iter()
                .map(|t| t.author_name.to_lowercase())
                .collect();
            for author in &authors {
                if other_authors.contains(author) {
                    *seen.entry(author.as_str()).or_default() += 1;
                }
            }
        }
        for (author, other_subjects) in seen {
            if other_subjects > MAX_SHARED_AUTHOR_SUBJECTS {
                signals.push(FraudSignal::SharedTestimonialAuthor {
                    author: author.to_string(),
                    other_subjects,
                });
            }
        }
    }

    if !signals.is_empty() {
        warn!(
            target: "registry::security",
            %subject,
            signals = signals.len(),
            "fraud signals detected"
        );
    }
    Ok(signals)
}
