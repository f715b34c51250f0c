use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    domain::{ParameterName, ParameterValue},
    storage::repository::{ParameterStore, StoreError},
};

/// Fetches decrypted values, in batches no larger than the store accepts.
pub struct ValueResolver<'a, S: ParameterStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ParameterStore + ?Sized> ValueResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Duplicate names are requested once, at their first position.
    pub async fn resolve(&self, names: &[ParameterName]) -> Result<Vec<ParameterValue>, StoreError> {
        let unique = unique_names(names);
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.store.max_batch_size().max(1);
        let mut values = Vec::with_capacity(unique.len());
        let mut missing = Vec::new();

        for chunk in unique.chunks(batch_size) {
            debug!(count = chunk.len(), "Resolving parameter values");
            let batch = self.store.get_parameters(chunk).await?;
            values.extend(batch.parameters);
            missing.extend(batch.invalid_names);
        }

        if !missing.is_empty() {
            warn!(count = missing.len(), "Some parameters could not be found");
            return Err(StoreError::ParametersNotFound(missing));
        }

        Ok(values)
    }
}

fn unique_names(names: &[ParameterName]) -> Vec<ParameterName> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
