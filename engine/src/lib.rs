//! The organization registry's trust & verification service.
//!
//! The engine coordinates:
//! - Registration and claim updates, sanitized and validated on the way in
//! - Per-actor rate limiting of every mutating operation
//! - Challenge issuance and proof verification for domains, GitHub,
//!   social platforms and chain addresses
//! - A background recheck sweep that moves failing proofs through their
//!   grace period to removal
//! - Community reports, attestations and trust scores
//! - Community alerts and directory queries over registered organizations
//!
//! Storage, HTTP and chain access are injected; see [`RegistryEngine::new`].

pub mod api;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod http_fetch;
pub mod logging;
pub mod metrics;
pub mod shutdown;
pub mod subject_locks;
pub mod sweep;

pub use api::{
    ApiReply, ApiRequest, ApiResponse, ChallengeRequest, ChallengeTarget, ChallengeView,
    ClaimView, EndorseRequest, ProofOutcome, ProofView, RegistrationResponse, ReportRequest,
    ReportResponse, ResolveRequest, StakeRequest, SubmitProofRequest, TestimonialRequest,
    VerificationState, VouchRequest,
};
pub use config::EngineConfig;
pub use directory::{
    ListRequest, OrganizationPage, OrganizationSummary, RegistryStatistics, SearchFilters,
};
pub use engine::RegistryEngine;
pub use error::{ApiError, EngineError, ErrorKind, RetryHint};
pub use http_fetch::HttpFetcher;
pub use logging::{init_logging, LogFormat};
pub use metrics::EngineMetrics;
pub use shutdown::ShutdownController;
pub use subject_locks::{SubjectGuard, SubjectLocks};
pub use sweep::{spawn_sweeper, SweepReport};
