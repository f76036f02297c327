//! Fundamental types for the cross-chain organization registry.
//!
//! This crate defines the data model shared across every other crate in the
//! workspace: subjects and their claims, challenges, verification proofs,
//! community attestations, disputes, alerts, timestamps and the tunable trust
//! parameters.

pub mod alert;
pub mod attestation;
pub mod challenge;
pub mod dispute;
pub mod error;
pub mod identity;
pub mod ids;
pub mod params;
pub mod platform;
pub mod proof;
pub mod time;

pub use alert::{AlertKind, AlertSeverity, CommunityAlert};
pub use attestation::{Attestation, Endorsement, ReputationState, Testimonial, Vouch};
pub use challenge::{ChainMethod, Challenge, ClaimKey, ProofSubmission, VerificationMethod};
pub use dispute::{AppealOutcome, Dispute, ReportType};
pub use error::TypesError;
pub use identity::{BasicInfo, ChainClaim, OrganizationIdentity, OrganizationStatus, PlatformHandles};
pub use ids::{ActorId, ChallengeId, ProofId, SubjectId};
pub use params::{GracePeriods, PlatformWeights, ReputationWeights, TrustParams};
pub use platform::{ChainType, Platform};
pub use proof::{ProofLocator, ProofStatus, StatusChange, VerificationProof, VerificationResult};
pub use time::{Clock, SystemClock, Timestamp};
