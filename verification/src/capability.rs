//! Outbound capabilities: HTTP-style fetching and per-chain reads.
//!
//! The engine never talks to the network directly. Production wiring passes
//! real clients; tests pass the nullable fakes.

use async_trait::async_trait;
use registry_types::ChainType;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("fetch timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

/// `GET url` returning status and body. Implementations bound their own I/O;
/// callers add an outer timeout as well.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("no client configured for chain {0}")]
    Unsupported(ChainType),

    #[error("chain query timed out")]
    Timeout,

    #[error("chain query failed: {0}")]
    Rpc(String),
}

/// Read-only access to one chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Whether `signature` over `message` was produced by the key behind `address`.
    async fn verify_signature(
        &self,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<bool, ChainError>;

    /// Public state under `key` at `address`, `None` when unset.
    async fn read_public_state(&self, address: &str, key: &str) -> Result<Option<String>, ChainError>;
}

/// Dispatches chain calls to the client registered for each chain.
#[derive(Clone, Default)]
pub struct ChainRouter {
    clients: HashMap<ChainType, Arc<dyn ChainClient>>,
}

impl ChainRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(mut self, chain: ChainType, client: Arc<dyn ChainClient>) -> Self {
        self.register(chain, client);
        self
    }

    pub fn register(&mut self, chain: ChainType, client: Arc<dyn ChainClient>) {
        self.clients.insert(chain, client);
    }

    pub fn supports(&self, chain: ChainType) -> bool {
        self.clients.contains_key(&chain)
    }

    fn client(&self, chain: ChainType) -> Result<&Arc<dyn ChainClient>, ChainError> {
        self.clients.get(&chain).ok_or(ChainError::Unsupported(chain))
    }

    pub async fn verify_signature(
        &self,
        chain: ChainType,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<bool, ChainError> {
        self.client(chain)?
            .verify_signature(address, message, signature)
            .await
    }

    pub async fn read_public_state(
        &self,
        chain: ChainType,
        address: &str,
        key: &str,
    ) -> Result<Option<String>, ChainError> {
        self.client(chain)?.read_public_state(address, key).await
    }
}
