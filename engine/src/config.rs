//! Engine configuration with TOML file support.

use crate::error::EngineError;
use crate::logging::LogFormat;
use registry_limiter::RateLimits;
use registry_monitor::DisputePolicyConfig;
use registry_types::TrustParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a registry engine instance.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long an issued challenge stays open, for every method.
    #[serde(default = "default_challenge_ttl")]
    pub challenge_ttl_secs: u64,

    /// Upper bound on a single fetch or chain query.
    #[serde(default = "default_check_timeout")]
    pub check_timeout_secs: u64,

    /// Interval between recheck sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Rechecks in flight at once during a sweep.
    #[serde(default = "default_sweep_concurrency")]
    pub sweep_concurrency: usize,

    /// Minimum grace applied to transient failures (timeouts, RPC errors).
    #[serde(default = "default_transient_floor")]
    pub transient_grace_floor_secs: u64,

    #[serde(default)]
    pub rate_limits: RateLimits,

    /// Platform weights, grace periods and the reputation formula.
    #[serde(default)]
    pub params: TrustParams,

    #[serde(default)]
    pub dispute_policy: DisputePolicyConfig,

    /// Actors allowed to resolve disputes.
    #[serde(default)]
    pub moderators: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_challenge_ttl() -> u64 {
    86_400
}

fn default_check_timeout() -> u64 {
    10
}

fn default_sweep_interval() -> u64 {
    86_400
}

fn default_sweep_concurrency() -> usize {
    16
}

fn default_transient_floor() -> u64 {
    86_400
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject values that would make the engine misbehave rather than fail.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.challenge_ttl_secs == 0 {
            return Err(EngineError::Config("challenge_ttl_secs must be positive".into()));
        }
        if self.check_timeout_secs == 0 {
            return Err(EngineError::Config("check_timeout_secs must be positive".into()));
        }
        if self.sweep_interval_secs == 0 {
            return Err(EngineError::Config("sweep_interval_secs must be positive".into()));
        }
        if self.sweep_concurrency == 0 {
            return Err(EngineError::Config("sweep_concurrency must be positive".into()));
        }
        if self.params.reputation.verification_divisor == 0 {
            return Err(EngineError::Config(
                "params.reputation.verification_divisor must be positive".into(),
            ));
        }
        self.log_format.parse::<LogFormat>()?;
        Ok(())
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            challenge_ttl_secs: default_challenge_ttl(),
            check_timeout_secs: default_check_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            sweep_concurrency: default_sweep_concurrency(),
            transient_grace_floor_secs: default_transient_floor(),
            rate_limits: RateLimits::default(),
            params: TrustParams::default(),
            dispute_policy: DisputePolicyConfig::default(),
            moderators: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.challenge_ttl_secs, 86_400);
        assert_eq!(config.rate_limits.report.max_attempts, 3);
        assert_eq!(config.params.grace.domain_secs, 7 * 86_400);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            challenge_ttl_secs = 172800
            moderators = ["mod-1"]

            [rate_limits.verify]
            max_attempts = 2
            window_secs = 60

            [params.weights]
            domain = 40

            [dispute_policy]
            kind = "reputation_gated"
            min_reporter_reputation = 25
        "#;
        let config = EngineConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.challenge_ttl_secs, 172_800);
        assert_eq!(config.rate_limits.verify.max_attempts, 2);
        assert_eq!(config.rate_limits.challenge.max_attempts, 5);
        assert_eq!(config.params.weights.domain, 40);
        assert_eq!(config.params.weights.github, 25);
        assert_eq!(
            config.dispute_policy,
            DisputePolicyConfig::ReputationGated {
                min_reporter_reputation: 25
            }
        );
    }

    #[test]
    fn round_trips_through_toml() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sweep_concurrency = 4").unwrap();
        let config = EngineConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.sweep_concurrency, 4);
    }

    #[test]
    fn rejects_nonsense() {
        assert!(matches!(
            EngineConfig::from_toml_str("sweep_concurrency = 0"),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str(r#"log_format = "xml""#),
            Err(EngineError::Config(_))
        ));
        assert!(EngineConfig::from_toml_file("/nonexistent/registry.toml").is_err());
    }
}
