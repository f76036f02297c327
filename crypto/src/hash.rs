//! Blake2b hashing for identifiers.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use registry_types::{ChallengeId, Platform, ProofId, SubjectId, Timestamp};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Deterministic proof id. Parts are length-prefixed so field boundaries cannot collide.
pub fn proof_id(
    subject: &SubjectId,
    platform: &Platform,
    target: &str,
    verified_at: Timestamp,
    challenge: &ChallengeId,
) -> ProofId {
    let platform = platform.to_string();
    let verified_at = verified_at.as_secs().to_be_bytes();
    let fields: [&[u8]; 5] = [
        subject.as_str().as_bytes(),
        platform.as_bytes(),
        target.as_bytes(),
        &verified_at,
        challenge.as_str().as_bytes(),
    ];
    let lens: Vec<[u8; 8]> = fields.iter().map(|f| (f.len() as u64).to_be_bytes()).collect();
    let mut parts: Vec<&[u8]> = Vec::with_capacity(fields.len() * 2);
    for (len, field) in lens.iter().zip(fields.iter()) {
        parts.push(len);
        parts.push(field);
    }
    ProofId::new(hex::encode(blake2b_256_multi(&parts)))
}
