//! Cryptographic primitives for the registry.
//!
//! - **Ed25519** for signing challenge messages and verifying signatures
//! - **Blake2b** for deterministic proof identifiers
//! - OS randomness for challenge ids, tokens and nonces

pub mod error;
pub mod hash;
pub mod keys;
pub mod random;
pub mod sign;

pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, proof_id};
pub use keys::{generate_keypair, keypair_from_seed, KeyPair, PrivateKey, PublicKey};
pub use random::{random_bytes, random_hex};
pub use sign::{parse_signature_hex, sign_message, verify_signature, verify_signature_hex};
