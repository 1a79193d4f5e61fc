mod config_error;
mod data_access_error;
mod estimation_error;

pub use config_error::ConfigError;
pub use data_access_error::DataAccessError;
pub use estimation_error::{ErrorKind, EstimationError};

/// Convenience alias used throughout the workspace.
pub type CostwiseResult<T> = Result<T, EstimationError>;
