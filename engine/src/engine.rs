//! The registry engine: wires intake, admission control, verification,
//! monitoring and scoring behind one handle.
//!
//! Every mutation of a subject runs under that subject's lock, so issuance,
//! proof creation and score recomputation never interleave for one subject.
//! Different subjects proceed in parallel.

use crate::api::{
    ApiReply, ApiRequest, ApiResponse, ChallengeRequest, ChallengeTarget, ChallengeView,
    ClaimView, EndorseRequest, ProofOutcome, ProofView, RegistrationResponse, ReportRequest,
    ReportResponse, StakeRequest, SubmitProofRequest, TestimonialRequest, VerificationState,
    VouchRequest,
};
use crate::config::EngineConfig;
use crate::directory::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::EngineError;
use crate::metrics::EngineMetrics;
use crate::subject_locks::SubjectLocks;
use registry_crypto::random_hex;
use registry_intake::{
    clean, sanitize, validate_registration, CleanRegistration, FieldKind, RegistrationForm,
    MAX_TEXT_LEN,
};
use registry_limiter::{Action, ActionLimiter};
use registry_monitor::{
    file_report, raise_alert, resolve_dispute, DisputePolicy, Monitor, MonitoringStats,
};
use registry_reputation::{
    community_validation, detect_fraud_signals, leaderboard, organizations_by_reputation,
    recompute_scores, CommunityValidationStats, FraudSignal, LeaderboardEntry, ScoreSnapshot,
};
use registry_store::{RegistryStore, StoreError};
use registry_types::{
    ActorId, AlertKind, AlertSeverity, AppealOutcome, ChainType, ClaimKey, Clock, CommunityAlert,
    OrganizationIdentity, Platform, ProofId, ProofStatus, ReputationState, SubjectId, Testimonial,
    Timestamp,
};
use registry_verification::{
    challenge_instructions, platform_instructions, ChainRouter, ChallengeIssuer, Fetcher, Prober,
    ProofVerifier, VerificationError,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

const SUBJECT_ID_BYTES: usize = 8;
const ALERT_ID_BYTES: usize = 8;
const PERSON_NAME_MAX: usize = 100;

pub struct RegistryEngine<S> {
    pub(crate) config: EngineConfig,
    pub(crate) store: Arc<S>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) limiter: ActionLimiter,
    issuer: ChallengeIssuer,
    verifier: ProofVerifier,
    pub(crate) monitor: Monitor,
    dispute_policy: Box<dyn DisputePolicy>,
    pub(crate) locks: SubjectLocks,
    pub(crate) metrics: Arc<EngineMetrics>,
    moderators: BTreeSet<ActorId>,
}

impl<S: RegistryStore + 'static> RegistryEngine<S> {
    pub fn new(
        config: EngineConfig,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn Fetcher>,
        chains: ChainRouter,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let prober = Prober::new(fetcher, chains, config.check_timeout());
        let monitor = Monitor::new(
            prober.clone(),
            config.params.grace.clone(),
            config.transient_grace_floor_secs,
        );
        let metrics = Arc::new(EngineMetrics::new()?);
        let moderators = config.moderators.iter().map(ActorId::new).collect();

        info!(
            challenge_ttl_secs = config.challenge_ttl_secs,
            check_timeout_secs = config.check_timeout_secs,
            dispute_policy = ?config.dispute_policy,
            "registry engine initialized"
        );

        Ok(Self {
            limiter: ActionLimiter::new(&config.rate_limits),
            issuer: ChallengeIssuer::new(config.challenge_ttl_secs),
            verifier: ProofVerifier::new(prober),
            monitor,
            dispute_policy: config.dispute_policy.build(),
            locks: SubjectLocks::new(),
            metrics,
            moderators,
            store,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn admit(&self, actor: &ActorId, action: Action) -> Result<(), EngineError> {
        let now = self.now();
        if self.limiter.admit(actor, action, now) {
            return Ok(());
        }
        self.metrics.rate_limited.inc();
        Err(EngineError::RateLimited {
            action,
            retry_after_secs: self.limiter.retry_after(actor, action, now),
            remaining: self.limiter.remaining(actor, action, now),
        })
    }

    fn identity(&self, subject: &SubjectId) -> Result<OrganizationIdentity, EngineError> {
        self.store.get_identity(subject).map_err(|e| match e {
            StoreError::NotFound(_) => EngineError::NotFound(format!("organization {subject}")),
            other => EngineError::Store(other),
        })
    }

    /// The identity, provided `actor` owns it.
    fn owned_identity(
        &self,
        actor: &ActorId,
        subject: &SubjectId,
        what: &str,
    ) -> Result<OrganizationIdentity, EngineError> {
        let identity = self.identity(subject)?;
        if !identity.is_owned_by(actor) {
            warn!(
                target: "registry::security",
                actor = %actor,
                subject = %subject,
                attempted = what,
                "unauthorized mutation attempt"
            );
            self.raise_security_alert(actor, subject, what);
            return Err(EngineError::Unauthorized(format!("{what} for {subject}")));
        }
        Ok(identity)
    }

    /// Failures are logged; the caller's Unauthorized still goes out.
    fn raise_security_alert(&self, actor: &ActorId, subject: &SubjectId, what: &str) {
        let raised = random_hex(ALERT_ID_BYTES)
            .map_err(EngineError::from)
            .and_then(|suffix| {
                let alert = CommunityAlert::new(
                    format!("security-{suffix}"),
                    subject.clone(),
                    AlertKind::SecurityEvent,
                    AlertSeverity::Critical,
                    format!("{actor} tried to {what} without owning the organization"),
                    self.now(),
                );
                Ok(raise_alert(&*self.store, &alert)?)
            });
        if let Err(e) = raised {
            warn!(target: "registry::security", subject = %subject, error = %e, "security alert not recorded");
        }
    }

    pub(crate) fn recompute(&self, subject: &SubjectId) -> Result<ScoreSnapshot, EngineError> {
        Ok(recompute_scores(
            &*self.store,
            subject,
            &self.config.params,
            self.now(),
        )?)
    }

    // ── Registration and claims ──────────────────────────────────────────

    /// Validate a registration form and record `actor` as the new subject's owner.
    pub async fn register_organization(
        &self,
        actor: &ActorId,
        form: &RegistrationForm,
    ) -> Result<RegistrationResponse, EngineError> {
        self.admit(actor, Action::Claim)?;
        let registration = validate_registration(form).map_err(EngineError::Validation)?;

        let id = loop {
            let candidate = SubjectId::new(format!("org-{}", random_hex(SUBJECT_ID_BYTES)?));
            if !self.store.identity_exists(&candidate)? {
                break candidate;
            }
        };
        let _guard = self.locks.lock(&id).await;

        let mut identity = OrganizationIdentity::new(id.clone(), actor.clone(), self.now());
        apply_registration(&mut identity, registration);
        self.store.put_identity(&identity)?;
        let scores = self.recompute(&id)?;

        info!(subject = %id, owner = %actor, name = %identity.basic_info.name, "organization registered");
        Ok(RegistrationResponse {
            subject_id: id,
            status: scores.status,
        })
    }

    /// Replace the subject's declared information and claims.
    ///
    /// Proofs whose claim is no longer declared are removed and open
    /// challenges for withdrawn claims are discarded.
    pub async fn submit_claim(
        &self,
        actor: &ActorId,
        subject: &SubjectId,
        form: &RegistrationForm,
    ) -> Result<VerificationState, EngineError> {
        self.admit(actor, Action::Claim)?;
        let registration = validate_registration(form).map_err(EngineError::Validation)?;
        let _guard = self.locks.lock(subject).await;
        let mut identity = self.owned_identity(actor, subject, "update claims")?;
        let now = self.now();

        let before = declared_claims(&identity);
        apply_registration(&mut identity, registration);
        identity.updated_at = now;
        let after = declared_claims(&identity);
        self.store.put_identity(&identity)?;

        for mut proof in self.store.proofs_for_subject(subject)? {
            if proof.is_monitored() && !after.contains(&(proof.platform, proof.target.clone())) {
                proof.transition(ProofStatus::Removed, now, "claim withdrawn");
                self.store.update_proof(&proof)?;
                info!(proof = %proof.id, subject = %subject, target = %proof.target, "proof removed with its claim");
            }
        }
        for (platform, target) in before.difference(&after) {
            let key = ClaimKey::new(subject.clone(), *platform, target.clone());
            if let Some(challenge) = self.store.challenge_for_claim(&key)? {
                self.store.delete_challenge(&challenge.id)?;
            }
        }

        self.recompute(subject)?;
        self.verification_state(subject)
    }

    // ── Verification ─────────────────────────────────────────────────────

    pub async fn request_challenge(
        &self,
        actor: &ActorId,
        request: &ChallengeRequest,
    ) -> Result<ChallengeView, EngineError> {
        self.admit(actor, Action::Challenge)?;
        let _guard = self.locks.lock(&request.subject).await;
        let identity = self.owned_identity(actor, &request.subject, "request a challenge")?;
        let now = self.now();
        let store = &*self.store;

        let challenge = match &request.target {
            ChallengeTarget::Domain { method } => {
                self.issuer.issue_domain_challenge(store, &identity, *method, now)?
            }
            ChallengeTarget::Platform { platform } => {
                self.issuer.issue_platform_challenge(store, &identity, *platform, now)?
            }
            ChallengeTarget::Chain {
                chain,
                address,
                method,
            } => self.issuer.issue_chain_challenge(
                store,
                &identity,
                *chain,
                address,
                method.clone(),
                now,
            )?,
        };
        self.metrics.challenges_issued.inc();
        let instructions = challenge_instructions(&challenge);
        Ok(ChallengeView::new(&challenge, instructions))
    }

    pub async fn submit_proof(
        &self,
        actor: &ActorId,
        request: &SubmitProofRequest,
    ) -> Result<ProofOutcome, EngineError> {
        self.admit(actor, Action::Verify)?;
        let _guard = self.locks.lock(&request.subject).await;
        self.owned_identity(actor, &request.subject, "submit a proof")?;

        // A challenge issued to another subject is reported as unknown.
        match self.store.get_challenge(&request.challenge_id)? {
            Some(challenge) if challenge.claim.subject == request.subject => {}
            _ => return Err(VerificationError::ChallengeNotFound.into()),
        }

        self.metrics.verifications.inc();
        let result = self
            .verifier
            .verify(
                &*self.store,
                &request.challenge_id,
                &request.submission,
                self.now(),
            )
            .await?;

        let verification_score = if result.success {
            self.metrics.verifications_succeeded.inc();
            self.recompute(&request.subject)?.verification_score
        } else {
            self.identity(&request.subject)?.verification_score
        };
        Ok(ProofOutcome {
            result,
            verification_score,
        })
    }

    /// Scores, status, declared claims and every proof ever created for the subject.
    pub fn verification_state(&self, subject: &SubjectId) -> Result<VerificationState, EngineError> {
        let identity = self.identity(subject)?;
        let proofs = self.store.proofs_for_subject(subject)?;
        let claims = declared_claims(&identity)
            .into_iter()
            .map(|(platform, target)| ClaimView {
                verified: proofs
                    .iter()
                    .any(|p| p.is_active() && p.platform == platform && p.target == target),
                platform,
                target,
            })
            .collect();

        Ok(VerificationState {
            subject: identity.id,
            name: identity.basic_info.name,
            status: identity.status,
            verification_score: identity.verification_score,
            reputation_score: identity.reputation_score,
            reputation_staked: identity.reputation_staked,
            claims,
            proofs: proofs.iter().map(ProofView::from).collect(),
        })
    }

    // ── Disputes ─────────────────────────────────────────────────────────

    /// The highest reputation among organizations `actor` owns.
    fn reporter_reputation(&self, actor: &ActorId) -> Result<u32, EngineError> {
        Ok(self
            .store
            .list_identities()?
            .iter()
            .filter(|i| i.is_owned_by(actor))
            .map(|i| i.reputation_score)
            .max()
            .unwrap_or(0))
    }

    pub async fn report_proof(
        &self,
        actor: &ActorId,
        request: &ReportRequest,
    ) -> Result<ReportResponse, EngineError> {
        self.admit(actor, Action::Report)?;
        let subject = match self.store.get_proof(&request.proof_id) {
            Ok(proof) => proof.subject,
            Err(StoreError::NotFound(_)) => {
                return Err(EngineError::NotFound(format!("proof {}", request.proof_id)))
            }
            Err(e) => return Err(e.into()),
        };
        let _guard = self.locks.lock(&subject).await;
        if self.identity(&subject)?.is_owned_by(actor) {
            return Err(EngineError::Unauthorized(
                "report a proof of an organization it owns".to_string(),
            ));
        }

        let evidence = sanitize(
            &FieldKind::Text {
                max_len: MAX_TEXT_LEN,
            },
            &request.evidence,
        );
        let outcome = file_report(
            &*self.store,
            self.dispute_policy.as_ref(),
            &request.proof_id,
            actor,
            request.report_type,
            evidence,
            self.reporter_reputation(actor)?,
            self.now(),
        )?;
        if outcome.disputed() {
            self.recompute(&subject)?;
        }

        Ok(ReportResponse {
            disputed: outcome.disputed(),
            dispute_id: outcome.dispute.id,
            proof_status: outcome.proof_status,
        })
    }

    /// Close the disputes on a proof. Moderators only.
    pub async fn resolve_dispute(
        &self,
        actor: &ActorId,
        proof_id: &ProofId,
        outcome: AppealOutcome,
    ) -> Result<ProofView, EngineError> {
        if !self.moderators.contains(actor) {
            warn!(target: "registry::security", actor = %actor, proof = %proof_id, "non-moderator tried to resolve a dispute");
            return Err(EngineError::Unauthorized("resolve disputes".to_string()));
        }
        let subject = self.store.get_proof(proof_id).map(|p| p.subject).map_err(|e| match e {
            StoreError::NotFound(_) => EngineError::NotFound(format!("proof {proof_id}")),
            other => EngineError::Store(other),
        })?;
        let _guard = self.locks.lock(&subject).await;
        let proof = resolve_dispute(&*self.store, proof_id, outcome, self.now())?;
        self.recompute(&subject)?;
        Ok(ProofView::from(&proof))
    }

    // ── Community ────────────────────────────────────────────────────────

    /// Endorse `request.subject` on behalf of an organization `actor` owns.
    pub async fn endorse(
        &self,
        actor: &ActorId,
        request: &EndorseRequest,
    ) -> Result<ScoreSnapshot, EngineError> {
        self.admit(actor, Action::Attest)?;
        self.owned_identity(actor, &request.endorser, "endorse")?;
        let message = sanitize(
            &FieldKind::Text {
                max_len: MAX_TEXT_LEN,
            },
            &request.message,
        );
        let _guard = self.locks.lock(&request.subject).await;
        registry_reputation::endorse(
            &*self.store,
            &request.endorser,
            actor,
            &request.subject,
            message,
            &self.config.params.reputation,
            self.now(),
        )?;
        self.recompute(&request.subject)
    }

    /// Testimonials enter unverified; the subject's owner verifies them.
    pub async fn add_testimonial(
        &self,
        actor: &ActorId,
        request: &TestimonialRequest,
    ) -> Result<Testimonial, EngineError> {
        self.admit(actor, Action::Attest)?;
        let name_kind = FieldKind::Text {
            max_len: PERSON_NAME_MAX,
        };
        let author_name = clean(&name_kind, &request.author_name)
            .map_err(|e| EngineError::field("author_name", e))?;
        let role = sanitize(&name_kind, &request.role);
        let message = clean(
            &FieldKind::Text {
                max_len: MAX_TEXT_LEN,
            },
            &request.message,
        )
        .map_err(|e| EngineError::field("message", e))?;

        let _guard = self.locks.lock(&request.subject).await;
        let testimonial = registry_reputation::add_testimonial(
            &*self.store,
            &request.subject,
            author_name,
            role,
            message,
            self.now(),
        )?;
        self.recompute(&request.subject)?;
        Ok(testimonial)
    }

    pub async fn verify_testimonial(
        &self,
        actor: &ActorId,
        subject: &SubjectId,
        testimonial_id: &str,
    ) -> Result<Testimonial, EngineError> {
        let _guard = self.locks.lock(subject).await;
        self.owned_identity(actor, subject, "verify a testimonial")?;
        let testimonial =
            registry_reputation::verify_testimonial(&*self.store, subject, testimonial_id)?;
        self.recompute(subject)?;
        Ok(testimonial)
    }

    pub async fn vouch(
        &self,
        actor: &ActorId,
        request: &VouchRequest,
    ) -> Result<ScoreSnapshot, EngineError> {
        self.admit(actor, Action::Attest)?;
        let _guard = self.locks.lock(&request.subject).await;
        if self.identity(&request.subject)?.is_owned_by(actor) {
            return Err(EngineError::Unauthorized(
                "vouch for an organization it owns".to_string(),
            ));
        }
        let message = sanitize(
            &FieldKind::Text {
                max_len: MAX_TEXT_LEN,
            },
            &request.message,
        );
        registry_reputation::vouch(&*self.store, actor, &request.subject, message, self.now())?;
        self.recompute(&request.subject)
    }

    /// Add to the value the owner has at risk. Returns the new total.
    pub async fn stake_reputation(
        &self,
        actor: &ActorId,
        request: &StakeRequest,
    ) -> Result<u64, EngineError> {
        self.admit(actor, Action::Attest)?;
        let _guard = self.locks.lock(&request.subject).await;
        self.owned_identity(actor, &request.subject, "stake reputation")?;
        let total =
            registry_reputation::stake_reputation(&*self.store, &request.subject, request.amount)?;
        self.recompute(&request.subject)?;
        Ok(total)
    }

    // ── Alerts ───────────────────────────────────────────────────────────

    pub fn community_alerts(
        &self,
        acknowledged: Option<bool>,
    ) -> Result<Vec<CommunityAlert>, EngineError> {
        Ok(registry_monitor::community_alerts(&*self.store, acknowledged)?)
    }

    pub fn subject_alerts(&self, subject: &SubjectId) -> Result<Vec<CommunityAlert>, EngineError> {
        self.identity(subject)?;
        Ok(registry_monitor::subject_alerts(&*self.store, subject)?)
    }

    /// Close an alert. The subject's owner or a moderator only.
    pub async fn acknowledge_alert(
        &self,
        actor: &ActorId,
        alert_id: &str,
    ) -> Result<CommunityAlert, EngineError> {
        self.admit(actor, Action::Attest)?;
        let subject = self.store.get_alert(alert_id).map(|a| a.subject).map_err(|e| match e {
            StoreError::NotFound(_) => EngineError::NotFound(format!("alert {alert_id}")),
            other => EngineError::Store(other),
        })?;
        let _guard = self.locks.lock(&subject).await;
        if !self.moderators.contains(actor) {
            self.owned_identity(actor, &subject, "acknowledge an alert")?;
        }
        Ok(registry_monitor::acknowledge_alert(
            &*self.store,
            alert_id,
            actor,
            self.now(),
        )?)
    }

    // ── Read-only views ──────────────────────────────────────────────────

    pub fn fraud_signals(&self, subject: &SubjectId) -> Result<Vec<FraudSignal>, EngineError> {
        Ok(detect_fraud_signals(&*self.store, subject)?)
    }

    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, EngineError> {
        Ok(leaderboard(&*self.store, limit)?)
    }

    pub fn organizations_by_reputation(
        &self,
        min_score: u32,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, EngineError> {
        Ok(organizations_by_reputation(&*self.store, min_score, limit)?)
    }

    pub fn community_validation(&self, subject: &SubjectId) -> Result<ReputationState, EngineError> {
        Ok(community_validation(&*self.store, subject)?)
    }

    pub fn community_validation_stats(
        &self,
        subject: &SubjectId,
    ) -> Result<CommunityValidationStats, EngineError> {
        let state = self.community_validation(subject)?;
        Ok(CommunityValidationStats::from_state(&state))
    }

    /// Counts over every stored proof. Also refreshes the pending-removal gauge.
    pub fn monitoring_stats(&self) -> Result<MonitoringStats, EngineError> {
        let proofs = self.store.list_proofs()?;
        let stats = MonitoringStats::collect(&proofs);
        self.metrics
            .pending_removal
            .set(i64::try_from(stats.pending_removal).unwrap_or(i64::MAX));
        Ok(stats)
    }

    pub fn instructions(&self, platform: Platform) -> String {
        platform_instructions(platform)
    }

    pub fn address_rules(&self, chain: ChainType) -> &'static str {
        registry_intake::address_rules(chain)
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    /// Route a presentation-layer request and wrap the result in the envelope.
    pub async fn handle(&self, actor: &ActorId, request: ApiRequest) -> ApiResponse<ApiReply> {
        let result = match request {
            ApiRequest::Register { form } => self
                .register_organization(actor, &form)
                .await
                .map(ApiReply::Registered),
            ApiRequest::SubmitClaim { subject, form } => self
                .submit_claim(actor, &subject, &form)
                .await
                .map(ApiReply::State),
            ApiRequest::RequestChallenge(req) => self
                .request_challenge(actor, &req)
                .await
                .map(ApiReply::Challenge),
            ApiRequest::SubmitProof(req) => {
                self.submit_proof(actor, &req).await.map(ApiReply::Proof)
            }
            ApiRequest::GetVerificationState { subject } => {
                self.verification_state(&subject).map(ApiReply::State)
            }
            ApiRequest::ReportProof(req) => {
                self.report_proof(actor, &req).await.map(ApiReply::Report)
            }
            ApiRequest::ResolveDispute(req) => self
                .resolve_dispute(actor, &req.proof_id, req.outcome)
                .await
                .map(ApiReply::ProofStatus),
            ApiRequest::Endorse(req) => self.endorse(actor, &req).await.map(ApiReply::Scores),
            ApiRequest::AddTestimonial(req) => self
                .add_testimonial(actor, &req)
                .await
                .map(ApiReply::Testimonial),
            ApiRequest::Vouch(req) => self.vouch(actor, &req).await.map(ApiReply::Scores),
            ApiRequest::Stake(req) => self
                .stake_reputation(actor, &req)
                .await
                .map(|total| ApiReply::Staked { total }),
            ApiRequest::VerifyTestimonial {
                subject,
                testimonial_id,
            } => self
                .verify_testimonial(actor, &subject, &testimonial_id)
                .await
                .map(ApiReply::Testimonial),
            ApiRequest::AcknowledgeAlert { alert_id } => self
                .acknowledge_alert(actor, &alert_id)
                .await
                .map(ApiReply::Alert),
            ApiRequest::MonitoringStats => self.monitoring_stats().map(ApiReply::Stats),
            ApiRequest::FraudSignals { subject } => self
                .fraud_signals(&subject)
                .map(|signals| ApiReply::FraudSignals { signals }),
            ApiRequest::Leaderboard { limit } => self
                .leaderboard(page_size(limit))
                .map(|entries| ApiReply::Leaderboard { entries }),
            ApiRequest::OrganizationsByReputation { min_score, limit } => self
                .organizations_by_reputation(min_score, page_size(limit))
                .map(|entries| ApiReply::Leaderboard { entries }),
            ApiRequest::SearchOrganizations { query } => self
                .search_organizations(&query)
                .map(|organizations| ApiReply::Organizations { organizations }),
            ApiRequest::ListOrganizations(req) => {
                self.list_organizations(&req).map(ApiReply::Page)
            }
            ApiRequest::RegistryStatistics => {
                self.registry_statistics().map(ApiReply::RegistryStats)
            }
            ApiRequest::CommunityValidation { subject } => self
                .community_validation(&subject)
                .map(ApiReply::CommunityValidation),
            ApiRequest::CommunityValidationStats { subject } => self
                .community_validation_stats(&subject)
                .map(ApiReply::CommunityStats),
            ApiRequest::CommunityAlerts { acknowledged } => self
                .community_alerts(acknowledged)
                .map(|alerts| ApiReply::Alerts { alerts }),
            ApiRequest::SubjectAlerts { subject } => self
                .subject_alerts(&subject)
                .map(|alerts| ApiReply::Alerts { alerts }),
            ApiRequest::Instructions { platform } => Ok(ApiReply::Instructions {
                text: self.instructions(platform),
            }),
            ApiRequest::AddressRules { chain } => Ok(ApiReply::AddressRules {
                rules: self.address_rules(chain).to_string(),
            }),
        };
        ApiResponse::from_reply(result)
    }
}

fn page_size(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

fn apply_registration(identity: &mut OrganizationIdentity, registration: CleanRegistration) {
    identity.basic_info = registration.basic_info;
    identity.handles = registration.handles;
    identity.chains = registration.chains;
}

/// Every (platform, target) the identity declares. The domain claim is the
/// explicit domain, or the website host when none is given.
fn declared_claims(identity: &OrganizationIdentity) -> BTreeSet<(Platform, String)> {
    let mut claims = BTreeSet::new();
    let domain_source = identity
        .handles
        .domain
        .as_deref()
        .unwrap_or(&identity.basic_info.website);
    if let Ok(domain) = clean(&FieldKind::Domain, domain_source) {
        claims.insert((Platform::Domain, domain));
    }
    for platform in [
        Platform::GitHub,
        Platform::Twitter,
        Platform::Discord,
        Platform::Telegram,
    ] {
        if let Some(handle) = identity.handle_for(platform) {
            claims.insert((platform, handle.to_string()));
        }
    }
    for claim in &identity.chains {
        claims.insert((Platform::Chain(claim.chain), claim.address.clone()));
    }
    claims
}
