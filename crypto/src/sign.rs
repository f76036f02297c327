//! Ed25519 message signing and verification.

use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Sign a message with a private key, returning the 64-byte signature.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> [u8; 64] {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    signing_key.sign(message).to_bytes()
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise.
/// Non-canonical signatures are rejected.
pub fn verify_signature(message: &[u8], signature: &[u8; 64], public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(signature);
    verifying_key.verify_strict(message, &dalek_sig).is_ok()
}

/// Decode a hex signature, tolerating an optional `0x` prefix.
pub fn parse_signature_hex(signature: &str) -> Result<[u8; 64], CryptoError> {
    let trimmed = signature.trim();
    let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(raw).map_err(|_| CryptoError::InvalidHex)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidLength { expected: 64, actual })
}

/// Verify a hex-encoded signature. Malformed hex is simply not a valid signature.
pub fn verify_signature_hex(message: &[u8], signature_hex: &str, public_key: &PublicKey) -> bool {
    match parse_signature_hex(signature_hex) {
        Ok(sig) => verify_signature(message, &sig, public_key),
        Err(_) => false,
    }
}
