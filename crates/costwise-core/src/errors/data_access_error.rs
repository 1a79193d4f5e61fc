use super::ErrorKind;

/// Failures surfaced by a Data Access Port implementation.
///
/// "No matching rows" is never an error: ports return an empty result instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataAccessError {
    #[error("data store unreachable: {message}")]
    Connectivity { message: String },

    #[error("query timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("query failed: {message}")]
    Backend { message: String },

    #[error("duplicate data point {id} at {recorded_at}")]
    DuplicateKey { id: String, recorded_at: String },

    #[error("invalid data point {id}: {reason}")]
    InvalidPoint { id: String, reason: String },
}

impl DataAccessError {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::Timeout { .. })
    }

    /// Timeouts are worth retrying later; anything else means the store is impaired.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::RetryLater,
            _ => ErrorKind::ServiceImpaired,
        }
    }
}
