use serde::{Deserialize, Serialize};

use super::{ConfigError, DataAccessError};

/// Top-level error returned by the estimation and coverage operations.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("invalid persona: {field} = {value:?} is not a recognized value")]
    InvalidPersona { field: String, value: String },

    #[error("region not supported: {region}")]
    RegionNotSupported { region: String },

    #[error("data access error: {0}")]
    DataAccess(#[from] DataAccessError),

    #[error("estimation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification for callers deciding what to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Fix your input.
    InvalidInput,
    /// Try again later.
    RetryLater,
    /// Service currently impaired.
    ServiceImpaired,
    /// The caller gave up on the request.
    Cancelled,
}

impl EstimationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPersona { .. } | Self::RegionNotSupported { .. } => ErrorKind::InvalidInput,
            Self::DataAccess(err) => err.kind(),
            Self::Config(_) => ErrorKind::ServiceImpaired,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn invalid_persona(field: &str, value: &str) -> Self {
        Self::InvalidPersona {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
