use std::result::Result as StdResult;

use expenseflow_config::ConfigError;
use expenseflow_core::CoreError;
use thiserror::Error;

/// Unified error type for the ledger, storage, and configuration layers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, AppError>;

impl AppError {
    /// Errors that describe a no-op rather than a failure.
    pub fn is_benign(&self) -> bool {
        matches!(self, AppError::Core(err) if err.is_benign())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => AppError::Storage(io.to_string()),
            ConfigError::Serde(message) | ConfigError::Invalid(message) => {
                AppError::Config(message)
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_benign() {
        let err = AppError::from(CoreError::NotFound("member `Z`".into()));
        assert!(err.is_benign());
        assert!(!AppError::Config("bad".into()).is_benign());
    }

    #[test]
    fn config_errors_map_by_kind() {
        let err = AppError::from(ConfigError::Invalid("tolerance".into()));
        assert!(matches!(err, AppError::Config(message) if message == "tolerance"));
    }
}
