//! Prometheus metrics for the registry engine.
//!
//! [`EngineMetrics`] owns a dedicated [`Registry`]; [`EngineMetrics::encode`]
//! renders it in the text exposition format for whatever serves `/metrics`.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

pub struct EngineMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub challenges_issued: IntCounter,
    /// Verification attempts that reached a check.
    pub verifications: IntCounter,
    pub verifications_succeeded: IntCounter,
    pub rechecks: IntCounter,
    /// Rechecks that did not find the proof (missing or transient).
    pub recheck_failures: IntCounter,
    pub proofs_removed: IntCounter,
    pub rate_limited: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Monitored proofs currently inside a grace window.
    pub pending_removal: IntGauge,
}

impl EngineMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let challenges_issued = register_int_counter_with_registry!(
            Opts::new("registry_challenges_issued_total", "Challenges issued"),
            registry
        )?;
        let verifications = register_int_counter_with_registry!(
            Opts::new("registry_verifications_total", "Proof verification attempts"),
            registry
        )?;
        let verifications_succeeded = register_int_counter_with_registry!(
            Opts::new(
                "registry_verifications_succeeded_total",
                "Proof verifications that created an Active proof"
            ),
            registry
        )?;
        let rechecks = register_int_counter_with_registry!(
            Opts::new("registry_rechecks_total", "Lifecycle rechecks performed"),
            registry
        )?;
        let recheck_failures = register_int_counter_with_registry!(
            Opts::new(
                "registry_recheck_failures_total",
                "Rechecks that did not find the proof"
            ),
            registry
        )?;
        let proofs_removed = register_int_counter_with_registry!(
            Opts::new("registry_proofs_removed_total", "Proofs moved to Removed"),
            registry
        )?;
        let rate_limited = register_int_counter_with_registry!(
            Opts::new("registry_rate_limited_total", "Requests denied by the rate limiter"),
            registry
        )?;
        let pending_removal = register_int_gauge_with_registry!(
            Opts::new(
                "registry_pending_removal",
                "Proofs currently failing rechecks inside their grace period"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            challenges_issued,
            verifications,
            verifications_succeeded,
            rechecks,
            recheck_failures,
            proofs_removed,
            rate_limited,
            pending_removal,
        })
    }

    /// Text exposition of every metric in the registry.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = EngineMetrics::new().unwrap();
        metrics.challenges_issued.inc();
        metrics.pending_removal.set(3);
        let text = metrics.encode().unwrap();
        assert!(text.contains("registry_challenges_issued_total 1"));
        assert!(text.contains("registry_pending_removal 3"));
        assert!(text.contains("registry_rate_limited_total 0"));
    }
}
