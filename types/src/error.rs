//! Parse errors for the string forms of registry types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown report type: {0}")]
    UnknownReportType(String),
}
