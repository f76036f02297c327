use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("os randomness unavailable: {0}")]
    Randomness(String),

    #[error("invalid hex encoding")]
    InvalidHex,

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
