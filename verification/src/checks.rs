//! Probes: one fetch or chain read, classified.
//!
//! Every probe is bounded by the configured timeout. Anything that does not
//! positively show the proof missing (timeouts, transport errors, unexpected
//! statuses, RPC failures) is `Transient`, so infrastructure trouble never
//! reads as a removed proof.

use crate::capability::{ChainRouter, FetchError, Fetcher};
use registry_types::{ChainType, ProofLocator};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The expected text or value is there.
    Present,
    /// The resource answered and the proof is not there.
    Missing(String),
    /// No reliable answer.
    Transient(String),
}

impl CheckOutcome {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    /// Why the check did not pass, if it did not.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Present => None,
            Self::Missing(r) | Self::Transient(r) => Some(r),
        }
    }
}

/// The capabilities a probe runs against, plus the per-check timeout.
#[derive(Clone)]
pub struct Prober {
    fetcher: Arc<dyn Fetcher>,
    chains: ChainRouter,
    timeout: Duration,
}

impl Prober {
    pub fn new(fetcher: Arc<dyn Fetcher>, chains: ChainRouter, timeout: Duration) -> Self {
        Self {
            fetcher,
            chains,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.timeout, fut).await.ok()
    }

    /// HTTP 200 with `expected` in the body is Present; 200 without it, 404
    /// and 410 are Missing; everything else is Transient.
    pub async fn url(&self, url: &str, expected: &str) -> CheckOutcome {
        let Some(result) = self.bounded(self.fetcher.fetch(url)).await else {
            debug!(url, "fetch timed out");
            return CheckOutcome::Transient("fetch timed out".to_string());
        };
        match result {
            Err(FetchError::Timeout) => CheckOutcome::Transient("fetch timed out".to_string()),
            Err(e) => CheckOutcome::Transient(e.to_string()),
            Ok(resp) => match resp.status {
                200 if resp.body.contains(expected) => CheckOutcome::Present,
                200 => CheckOutcome::Missing(format!("expected text not found at {url}")),
                404 | 410 => CheckOutcome::Missing(format!("{url} returned HTTP {}", resp.status)),
                status => CheckOutcome::Transient(format!("{url} returned HTTP {status}")),
            },
        }
    }

    /// Byte-for-byte comparison of the value under `key` at `address`.
    pub async fn chain_state(
        &self,
        chain: ChainType,
        address: &str,
        key: &str,
        expected: &str,
    ) -> CheckOutcome {
        let Some(result) = self
            .bounded(self.chains.read_public_state(chain, address, key))
            .await
        else {
            return CheckOutcome::Transient("chain query timed out".to_string());
        };
        match result {
            Ok(Some(value)) if value.as_bytes() == expected.as_bytes() => CheckOutcome::Present,
            Ok(Some(_)) => CheckOutcome::Missing(format!("{key} at {address} does not match")),
            Ok(None) => CheckOutcome::Missing(format!("{key} is not set at {address}")),
            Err(e) => CheckOutcome::Transient(e.to_string()),
        }
    }

    pub async fn signature(
        &self,
        chain: ChainType,
        address: &str,
        message: &str,
        signature: &str,
    ) -> CheckOutcome {
        let Some(result) = self
            .bounded(self.chains.verify_signature(chain, address, message, signature))
            .await
        else {
            return CheckOutcome::Transient("signature check timed out".to_string());
        };
        match result {
            Ok(true) => CheckOutcome::Present,
            Ok(false) => CheckOutcome::Missing("signature mismatch".to_string()),
            Err(e) => CheckOutcome::Transient(e.to_string()),
        }
    }

    /// Re-run the check a stored proof points at.
    pub async fn locator(&self, locator: &ProofLocator) -> CheckOutcome {
        probe_locator(self, locator).await
    }
}

pub async fn probe_locator(prober: &Prober, locator: &ProofLocator) -> CheckOutcome {
    match locator {
        ProofLocator::Url { url, expected } => prober.url(url, expected).await,
        ProofLocator::ChainState {
            chain,
            address,
            key,
            expected,
        } => prober.chain_state(*chain, address, key, expected).await,
        ProofLocator::Signature {
            chain,
            address,
            message,
            signature,
        } => prober.signature(*chain, address, message, signature).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FetchResponse;
    use async_trait::async_trait;

    struct Scripted(Result<FetchResponse, FetchError>);

    #[async_trait]
    impl Fetcher for Scripted {
        async fn fetch(&self, _url: &str) -> Result<FetchResponse, FetchError> {
            self.0.clone()
        }
    }

    struct Hanging;

    #[async_trait]
    impl Fetcher for Hanging {
        async fn fetch(&self, _url: &str) -> Result<FetchResponse, FetchError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(FetchResponse::new(200, "tok"))
        }
    }

    fn prober(f: impl Fetcher + 'static) -> Prober {
        Prober::new(Arc::new(f), ChainRouter::new(), Duration::from_secs(10))
    }

    #[tokio::test]
    async fn status_classification() {
        let cases = [
            (Ok(FetchResponse::new(200, "x tok y")), CheckOutcome::Present),
            (Ok(FetchResponse::new(200, "nothing")), CheckOutcome::Missing(String::new())),
            (Ok(FetchResponse::new(404, "")), CheckOutcome::Missing(String::new())),
            (Ok(FetchResponse::new(410, "")), CheckOutcome::Missing(String::new())),
            (Ok(FetchResponse::new(503, "tok")), CheckOutcome::Transient(String::new())),
            (Err(FetchError::Transport("reset".into())), CheckOutcome::Transient(String::new())),
        ];
        for (response, expected) in cases {
            let got = prober(Scripted(response)).url("https://e.x", "tok").await;
            assert_eq!(
                std::mem::discriminant(&got),
                std::mem::discriminant(&expected),
                "{got:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_fetch_is_transient() {
        let got = prober(Hanging).url("https://e.x", "tok").await;
        assert_eq!(got, CheckOutcome::Transient("fetch timed out".into()));
    }

    #[tokio::test]
    async fn unsupported_chain_is_transient() {
        let got = prober(Scripted(Err(FetchError::Timeout)))
            .chain_state(ChainType::Ton, "addr", "k", "v")
            .await;
        assert!(matches!(got, CheckOutcome::Transient(_)));
    }
}
