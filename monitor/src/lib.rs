//! Proof lifecycle monitoring.
//!
//! A proof is created Active by the verifier and from then on only changes
//! status here:
//!
//! ```text
//! Active --recheck fails past grace--> Removed
//! Active --report accepted----------> Disputed --upheld--> Active
//!                                              --denied--> Removed
//! Disputed --recheck fails past grace-> Removed
//! ```
//!
//! Removed is terminal. Re-verifying a removed claim creates a new proof.
//! Removals and accepted disputes raise a community alert.

pub mod alerts;
pub mod dispute;
pub mod error;
pub mod lifecycle;
pub mod recheck;
pub mod stats;

pub use alerts::{acknowledge_alert, community_alerts, raise_alert, subject_alerts};
pub use dispute::{
    file_report, resolve_dispute, DisputeContext, DisputePolicy, DisputePolicyConfig, OpenPolicy,
    QuotaPolicy, ReportOutcome, ReputationGate,
};
pub use error::MonitorError;
pub use lifecycle::{apply_outcome, LifecycleEvent};
pub use recheck::Monitor;
pub use stats::MonitoringStats;
