use thiserror::Error;

/// Why a value was rejected. `Required` and `Format` are kept distinct so
/// callers can present different messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("this field is required")]
    Required,

    #[error("invalid format: {0}")]
    Format(String),

    #[error("length must be between {min} and {max} characters, got {actual}")]
    Length { min: usize, max: usize, actual: usize },

    #[error("value must be between {min} and {max}, got {actual}")]
    Range { min: u64, max: u64, actual: u64 },

    #[error("unsupported URL scheme: only http and https are allowed")]
    UnsupportedScheme,

    #[error("URL must be from authorized domains: {0}")]
    DomainNotAllowed(String),

    #[error("suspicious input: {0}")]
    Suspicious(String),

    #[error("unknown field kind: {0}")]
    UnknownKind(String),
}
