//! Request and response shapes for the presentation layer.
//!
//! Everything here is plain serde data. The engine never renders HTML or
//! talks HTTP; a front end serializes these as it sees fit.

use crate::directory::{ListRequest, OrganizationPage, OrganizationSummary, RegistryStatistics};
use crate::error::{ApiError, EngineError, ErrorKind};
use registry_intake::RegistrationForm;
use registry_monitor::MonitoringStats;
use registry_reputation::{CommunityValidationStats, FraudSignal, LeaderboardEntry, ScoreSnapshot};
use registry_types::{
    AppealOutcome, ChainType, Challenge, ChallengeId, CommunityAlert, OrganizationStatus, Platform,
    ProofId, ProofStatus, ProofSubmission, ReportType, ReputationState, StatusChange, SubjectId,
    Testimonial, Timestamp, VerificationProof, VerificationResult,
};
use registry_verification::{ChainMethodRequest, DomainMethod};
use serde::{Deserialize, Serialize};

// ── Challenges ───────────────────────────────────────────────────────────

/// What to prove, and how.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeTarget {
    Domain {
        #[serde(default)]
        method: DomainMethod,
    },
    /// GitHub or a social platform; the method follows from the platform.
    Platform { platform: Platform },
    Chain {
        chain: ChainType,
        address: String,
        method: ChainMethodRequest,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRequest {
    pub subject: SubjectId,
    pub target: ChallengeTarget,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    pub challenge_id: ChallengeId,
    pub platform: Platform,
    pub target: String,
    pub method: String,
    /// The token, or the message to sign.
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_text: Option<String>,
    pub expires_at: Timestamp,
    pub instructions: String,
}

impl ChallengeView {
    pub fn new(challenge: &Challenge, instructions: String) -> Self {
        Self {
            challenge_id: challenge.id.clone(),
            platform: challenge.claim.platform,
            target: challenge.claim.target.clone(),
            method: challenge.method.name().to_string(),
            token: challenge.token.clone(),
            required_text: challenge.required_text.clone(),
            expires_at: challenge.expires_at,
            instructions,
        }
    }
}

// ── Proofs ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitProofRequest {
    pub subject: SubjectId,
    pub challenge_id: ChallengeId,
    #[serde(default = "no_submission")]
    pub submission: ProofSubmission,
}

fn no_submission() -> ProofSubmission {
    ProofSubmission::None
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOutcome {
    pub result: VerificationResult,
    /// The subject's verification score after this attempt.
    pub verification_score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofView {
    pub id: ProofId,
    pub platform: Platform,
    pub target: String,
    pub method: String,
    pub status: ProofStatus,
    pub verified_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_removal_since: Option<Timestamp>,
    pub history: Vec<StatusChange>,
}

impl From<&VerificationProof> for ProofView {
    fn from(proof: &VerificationProof) -> Self {
        Self {
            id: proof.id.clone(),
            platform: proof.platform,
            target: proof.target.clone(),
            method: proof.method.name().to_string(),
            status: proof.status,
            verified_at: proof.verified_at,
            pending_removal_since: proof.pending_removal_since,
            history: proof.history.clone(),
        }
    }
}

/// A claim as declared by the owner, with whether an Active proof backs it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimView {
    pub platform: Platform,
    pub target: String,
    pub verified: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    pub subject: SubjectId,
    pub name: String,
    pub status: OrganizationStatus,
    pub verification_score: u32,
    pub reputation_score: u32,
    pub reputation_staked: u64,
    pub claims: Vec<ClaimView>,
    pub proofs: Vec<ProofView>,
}

// ── Disputes ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub proof_id: ProofId,
    pub report_type: ReportType,
    #[serde(default)]
    pub evidence: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub dispute_id: String,
    pub proof_status: ProofStatus,
    pub disputed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub proof_id: ProofId,
    pub outcome: AppealOutcome,
}

// ── Registration and community ───────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub subject_id: SubjectId,
    pub status: OrganizationStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorseRequest {
    /// The organization the actor endorses on behalf of.
    pub endorser: SubjectId,
    pub subject: SubjectId,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialRequest {
    pub subject: SubjectId,
    pub author_name: String,
    #[serde(default)]
    pub role: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VouchRequest {
    pub subject: SubjectId,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRequest {
    pub subject: SubjectId,
    pub amount: u64,
}

// ── Dispatch ─────────────────────────────────────────────────────────────

/// The mutating and read operations a front end routes to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ApiRequest {
    Register { form: RegistrationForm },
    SubmitClaim { subject: SubjectId, form: RegistrationForm },
    RequestChallenge(ChallengeRequest),
    SubmitProof(SubmitProofRequest),
    GetVerificationState { subject: SubjectId },
    ReportProof(ReportRequest),
    ResolveDispute(ResolveRequest),
    Endorse(EndorseRequest),
    AddTestimonial(TestimonialRequest),
    Vouch(VouchRequest),
    Stake(StakeRequest),
    VerifyTestimonial {
        subject: SubjectId,
        testimonial_id: String,
    },
    AcknowledgeAlert { alert_id: String },
    MonitoringStats,
    FraudSignals { subject: SubjectId },
    Leaderboard { limit: Option<usize> },
    OrganizationsByReputation { min_score: u32, limit: Option<usize> },
    SearchOrganizations { query: String },
    ListOrganizations(ListRequest),
    RegistryStatistics,
    CommunityValidation { subject: SubjectId },
    CommunityValidationStats { subject: SubjectId },
    /// All alerts; `acknowledged` narrows to open or closed ones.
    CommunityAlerts {
        #[serde(default)]
        acknowledged: Option<bool>,
    },
    SubjectAlerts { subject: SubjectId },
    Instructions { platform: Platform },
    AddressRules { chain: ChainType },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiReply {
    Registered(RegistrationResponse),
    State(VerificationState),
    Challenge(ChallengeView),
    Proof(ProofOutcome),
    Report(ReportResponse),
    ProofStatus(ProofView),
    Scores(ScoreSnapshot),
    Testimonial(Testimonial),
    Staked { total: u64 },
    Stats(MonitoringStats),
    FraudSignals { signals: Vec<FraudSignal> },
    Leaderboard { entries: Vec<LeaderboardEntry> },
    Organizations { organizations: Vec<OrganizationSummary> },
    Page(OrganizationPage),
    RegistryStats(RegistryStatistics),
    CommunityValidation(ReputationState),
    CommunityStats(CommunityValidationStats),
    Alerts { alerts: Vec<CommunityAlert> },
    Alert(CommunityAlert),
    Instructions { text: String },
    AddressRules { rules: String },
}

/// The envelope every reply travels in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApiResponse<T> {
    Ok { data: T },
    Err { error: ApiError },
}

impl<T> ApiResponse<T> {
    pub fn from_result(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(data) => Self::Ok { data },
            Err(e) => Self::Err { error: e.to_api() },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Ok { .. } => None,
            Self::Err { error } => Some(error),
        }
    }
}

impl ApiResponse<ApiReply> {
    /// A verification attempt that ran but failed is reported as an error
    /// of kind `verification_failed`, carrying the verifier's reason.
    pub fn from_reply(result: Result<ApiReply, EngineError>) -> Self {
        match result {
            Ok(ApiReply::Proof(outcome)) if !outcome.result.success => Self::Err {
                error: ApiError::new(ErrorKind::VerificationFailed, outcome.result.message),
            },
            other => Self::from_result(other),
        }
    }
}
