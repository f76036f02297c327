//! Nullable store: thread-safe in-memory storage for testing.

use registry_store::{
    AlertStore, AttestationStore, ChallengeStore, DisputeStore, IdentityStore, ProofStore,
    StoreError,
};
use registry_types::{
    Attestation, Challenge, ChallengeId, ClaimKey, CommunityAlert, Dispute, OrganizationIdentity,
    ProofId, ReputationState, SubjectId, VerificationProof,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory registry store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    identities: Mutex<HashMap<SubjectId, OrganizationIdentity>>,
    challenges: Mutex<HashMap<ChallengeId, Challenge>>,
    claim_index: Mutex<HashMap<ClaimKey, ChallengeId>>,
    /// Append order is kept so listings are stable.
    proofs: Mutex<Vec<VerificationProof>>,
    reputations: Mutex<HashMap<SubjectId, ReputationState>>,
    disputes: Mutex<Vec<Dispute>>,
    alerts: Mutex<Vec<CommunityAlert>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of challenge records held, consumed ones included.
    pub fn challenge_count(&self) -> usize {
        self.challenges.lock().unwrap().len()
    }
}

impl IdentityStore for NullStore {
    fn get_identity(&self, id: &SubjectId) -> Result<OrganizationIdentity, StoreError> {
        self.identities
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_identity(&self, identity: &OrganizationIdentity) -> Result<(), StoreError> {
        self.identities
            .lock()
            .unwrap()
            .insert(identity.id.clone(), identity.clone());
        Ok(())
    }

    fn identity_exists(&self, id: &SubjectId) -> Result<bool, StoreError> {
        Ok(self.identities.lock().unwrap().contains_key(id))
    }

    fn list_identities(&self) -> Result<Vec<OrganizationIdentity>, StoreError> {
        let mut all: Vec<_> = self.identities.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

impl ChallengeStore for NullStore {
    fn get_challenge(&self, id: &ChallengeId) -> Result<Option<Challenge>, StoreError> {
        Ok(self.challenges.lock().unwrap().get(id).cloned())
    }

    fn put_challenge(&self, challenge: &Challenge) -> Result<(), StoreError> {
        self.challenges
            .lock()
            .unwrap()
            .insert(challenge.id.clone(), challenge.clone());
        self.claim_index
            .lock()
            .unwrap()
            .insert(challenge.claim.clone(), challenge.id.clone());
        Ok(())
    }

    fn delete_challenge(&self, id: &ChallengeId) -> Result<(), StoreError> {
        self.challenges.lock().unwrap().remove(id);
        self.claim_index.lock().unwrap().retain(|_, v| v != id);
        Ok(())
    }

    fn challenge_for_claim(&self, claim: &ClaimKey) -> Result<Option<Challenge>, StoreError> {
        let id = self.claim_index.lock().unwrap().get(claim).cloned();
        Ok(id.and_then(|id| self.challenges.lock().unwrap().get(&id).cloned()))
    }
}

impl ProofStore for NullStore {
    fn append_proof(&self, proof: &VerificationProof) -> Result<(), StoreError> {
        let mut proofs = self.proofs.lock().unwrap();
        if proofs.iter().any(|p| p.id == proof.id) {
            return Err(StoreError::Duplicate(proof.id.to_string()));
        }
        proofs.push(proof.clone());
        Ok(())
    }

    fn update_proof(&self, proof: &VerificationProof) -> Result<(), StoreError> {
        let mut proofs = self.proofs.lock().unwrap();
        let slot = proofs
            .iter_mut()
            .find(|p| p.id == proof.id)
            .ok_or_else(|| StoreError::NotFound(proof.id.to_string()))?;
        *slot = proof.clone();
        Ok(())
    }

    fn get_proof(&self, id: &ProofId) -> Result<VerificationProof, StoreError> {
        self.proofs
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn proofs_for_subject(&self, subject: &SubjectId) -> Result<Vec<VerificationProof>, StoreError> {
        Ok(self
            .proofs
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.subject == subject)
            .cloned()
            .collect())
    }

    fn list_proofs(&self) -> Result<Vec<VerificationProof>, StoreError> {
        Ok(self.proofs.lock().unwrap().clone())
    }
}

impl AttestationStore for NullStore {
    fn get_reputation(&self, subject: &SubjectId) -> Result<ReputationState, StoreError> {
        Ok(self
            .reputations
            .lock()
            .unwrap()
            .get(subject)
            .cloned()
            .unwrap_or_default())
    }

    fn append_attestation(&self, subject: &SubjectId, attestation: &Attestation) -> Result<(), StoreError> {
        self.reputations
            .lock()
            .unwrap()
            .entry(subject.clone())
            .or_default()
            .push(attestation.clone());
        Ok(())
    }

    fn put_reputation(&self, subject: &SubjectId, state: &ReputationState) -> Result<(), StoreError> {
        self.reputations
            .lock()
            .unwrap()
            .insert(subject.clone(), state.clone());
        Ok(())
    }
}

impl DisputeStore for NullStore {
    fn append_dispute(&self, dispute: &Dispute) -> Result<(), StoreError> {
        let mut disputes = self.disputes.lock().unwrap();
        if disputes.iter().any(|d| d.id == dispute.id) {
            return Err(StoreError::Duplicate(dispute.id.clone()));
        }
        disputes.push(dispute.clone());
        Ok(())
    }

    fn update_dispute(&self, dispute: &Dispute) -> Result<(), StoreError> {
        let mut disputes = self.disputes.lock().unwrap();
        let slot = disputes
            .iter_mut()
            .find(|d| d.id == dispute.id)
            .ok_or_else(|| StoreError::NotFound(dispute.id.clone()))?;
        *slot = dispute.clone();
        Ok(())
    }

    fn disputes_for_proof(&self, proof: &ProofId) -> Result<Vec<Dispute>, StoreError> {
        Ok(self
            .disputes
            .lock()
            .unwrap()
            .iter()
            .filter(|d| &d.proof_id == proof)
            .cloned()
            .collect())
    }
}

impl AlertStore for NullStore {
    fn append_alert(&self, alert: &CommunityAlert) -> Result<(), StoreError> {
        let mut alerts = self.alerts.lock().unwrap();
        if alerts.iter().any(|a| a.id == alert.id) {
            return Err(StoreError::Duplicate(alert.id.clone()));
        }
        alerts.push(alert.clone());
        Ok(())
    }

    fn update_alert(&self, alert: &CommunityAlert) -> Result<(), StoreError> {
        let mut alerts = self.alerts.lock().unwrap();
        let slot = alerts
            .iter_mut()
            .find(|a| a.id == alert.id)
            .ok_or_else(|| StoreError::NotFound(alert.id.clone()))?;
        *slot = alert.clone();
        Ok(())
    }

    fn get_alert(&self, id: &str) -> Result<CommunityAlert, StoreError> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn alerts_for_subject(&self, subject: &SubjectId) -> Result<Vec<CommunityAlert>, StoreError> {
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| &a.subject == subject)
            .cloned()
            .collect())
    }

    fn list_alerts(&self) -> Result<Vec<CommunityAlert>, StoreError> {
        Ok(self.alerts.lock().unwrap().clone())
    }
}
