use thiserror::Error;

use crate::{
    domain::{ParameterMetadata, ParameterName, ParameterValue},
    filters::FilterSpec,
};

/// One page of a describe call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribePage {
    pub parameters: Vec<ParameterMetadata>,
    pub next_token: Option<String>,
}

impl DescribePage {
    pub fn new(parameters: Vec<ParameterMetadata>, next_token: Option<String>) -> Self {
        Self {
            parameters,
            next_token,
        }
    }

    /// Continuation token, if the provider signalled more pages.
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Result of one batched value lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBatch {
    pub parameters: Vec<ParameterValue>,
    /// Requested names the provider could not find.
    pub invalid_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Parameters not found: {}", .0.join(", "))]
    ParametersNotFound(Vec<String>),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Read access to a remote parameter store.
#[async_trait::async_trait]
pub trait ParameterStore: Send + Sync {
    /// Maximum number of names accepted by a single `get_parameters` call.
    fn max_batch_size(&self) -> usize {
        10
    }

    async fn describe_parameters(
        &self,
        filter: &FilterSpec,
        next_token: Option<&str>,
    ) -> Result<DescribePage, StoreError>;

    /// Fetches decrypted values for `names`.
    async fn get_parameters(&self, names: &[ParameterName]) -> Result<ParameterBatch, StoreError>;
}
