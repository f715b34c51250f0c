use thiserror::Error;

use crate::storage::repository::StoreError;

/// Terminal failures of an export run. None of them are retried.
#[derive(Debug, Error)]
pub enum SsmEnvError {
    /// Malformed user input: tag filters, parameter types, file paths.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anything the parameter store reported.
    #[error(transparent)]
    Remote(#[from] StoreError),

    /// `--fail-exists` and the variable is already set.
    #[error("{name} already exists")]
    Collision { name: String },
}

impl SsmEnvError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
