//! Nullable chain: an in-memory ledger of keys and public state.
//!
//! Addresses are bound to Ed25519 public keys; signatures are checked for
//! real against the bound key so tests exercise actual cryptography.

use async_trait::async_trait;
use registry_crypto::{verify_signature_hex, PublicKey};
use registry_verification::{ChainClient, ChainError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct NullChain {
    keys: Mutex<HashMap<String, PublicKey>>,
    state: Mutex<HashMap<(String, String), String>>,
    failing: AtomicBool,
}

impl NullChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `address` controlled by `key`.
    pub fn bind_key(&self, address: &str, key: PublicKey) {
        self.keys.lock().unwrap().insert(address.to_string(), key);
    }

    pub fn set_state(&self, address: &str, key: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .insert((address.to_string(), key.to_string()), value.to_string());
    }

    pub fn clear_state(&self, address: &str, key: &str) {
        self.state
            .lock()
            .unwrap()
            .remove(&(address.to_string(), key.to_string()));
    }

    /// While failing, every call returns an RPC error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_up(&self) -> Result<(), ChainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("node unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for NullChain {
    async fn verify_signature(
        &self,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<bool, ChainError> {
        self.check_up()?;
        let key = self.keys.lock().unwrap().get(address).copied();
        Ok(key.is_some_and(|key| verify_signature_hex(message.as_bytes(), signature, &key)))
    }

    async fn read_public_state(&self, address: &str, key: &str) -> Result<Option<String>, ChainError> {
        self.check_up()?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .get(&(address.to_string(), key.to_string()))
            .cloned())
    }
}
