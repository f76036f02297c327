//! Ownership proofs for registry claims.
//!
//! Two halves:
//! 1. **Issuance**: a time-boxed, single-use challenge per claim, carrying the
//!    verification method chosen by the caller.
//! 2. **Verification**: the stored method decides which check runs. Checks
//!    delegate all I/O to the [`Fetcher`] and [`ChainClient`] capabilities.
//!
//! The same probes back the lifecycle monitor's rechecks.

pub mod capability;
pub mod checks;
pub mod error;
pub mod formats;
pub mod instructions;
pub mod issuer;
pub mod verifier;

pub use capability::{
    ChainClient, ChainError, ChainRouter, FetchError, FetchResponse, Fetcher,
};
pub use checks::{probe_locator, CheckOutcome, Prober};
pub use error::VerificationError;
pub use instructions::{challenge_instructions, platform_instructions};
pub use issuer::{ChainMethodRequest, ChallengeIssuer, DomainMethod};
pub use verifier::ProofVerifier;
