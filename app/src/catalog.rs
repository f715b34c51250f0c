use tracing::debug;

use crate::{
    domain::ParameterMetadata,
    filters::FilterSpec,
    storage::repository::{ParameterStore, StoreError},
};

/// Metadata lookups against a [`ParameterStore`], following continuation
/// tokens until the store reports the last page.
pub struct ParameterCatalog<'a, S: ParameterStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ParameterStore + ?Sized> ParameterCatalog<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn describe(&self, spec: &FilterSpec) -> Result<Vec<ParameterMetadata>, StoreError> {
        let mut metadata = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .store
                .describe_parameters(spec, next_token.as_deref())
                .await?;
            pages += 1;
            debug!(
                dimension = %spec.dimension(),
                page = pages,
                count = page.parameters.len(),
                "Received parameter metadata page"
            );

            next_token = page.continuation().map(str::to_string);
            metadata.extend(page.parameters);

            if next_token.is_none() {
                break;
            }
        }

        Ok(metadata)
    }

    /// Runs each spec in turn and concatenates the results. A parameter
    /// matched by several specs appears once per spec.
    pub async fn describe_all(
        &self,
        specs: &[FilterSpec],
    ) -> Result<Vec<ParameterMetadata>, StoreError> {
        let mut metadata = Vec::new();
        for spec in specs {
            metadata.extend(self.describe(spec).await?);
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ParameterType,
        filters::FilterBuilder,
        storage::adapters::local_storage::{LocalStorage, StoredParameter},
    };

    fn storage(count: usize) -> LocalStorage {
        LocalStorage::with_parameters(
            (0..count)
                .map(|i| StoredParameter::new(format!("/app/p{i:02}"), ParameterType::String, "v"))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_describe_collects_every_page_in_order() {
        let store = storage(7).with_page_size(3);
        let spec = &FilterBuilder::new().paths(&["/app"]).build().unwrap()[0];

        let metadata = ParameterCatalog::new(&store).describe(spec).await.unwrap();

        let names: Vec<_> = metadata.iter().map(|m| m.name().to_string()).collect();
        let expected: Vec<_> = (0..7).map(|i| format!("/app/p{i:02}")).collect();
        assert_eq!(names, expected);
        assert_eq!(store.describe_calls(), 3);
    }

    #[tokio::test]
    async fn test_describe_without_matches_is_one_call() {
        let store = storage(2);
        let spec = &FilterBuilder::new().paths(&["/nothing"]).build().unwrap()[0];

        let metadata = ParameterCatalog::new(&store).describe(spec).await.unwrap();

        assert!(metadata.is_empty());
        assert_eq!(store.describe_calls(), 1);
    }

    #[tokio::test]
    async fn test_describe_all_keeps_duplicates_across_specs() {
        let store = storage(2);
        let specs = FilterBuilder::new()
            .names(&["/app/p01"])
            .paths(&["/app"])
            .build()
            .unwrap();

        let metadata = ParameterCatalog::new(&store)
            .describe_all(&specs)
            .await
            .unwrap();

        let names: Vec<_> = metadata.iter().map(|m| m.name().as_str()).collect();
        assert_eq!(names, vec!["/app/p01", "/app/p00", "/app/p01"]);
    }

    #[tokio::test]
    async fn test_describe_propagates_store_errors() {
        let store = storage(2).with_failure(StoreError::QueryFailed("ThrottlingException".into()));
        let spec = &FilterBuilder::new().paths(&["/app"]).build().unwrap()[0];

        let result = ParameterCatalog::new(&store).describe(spec).await;

        assert_eq!(
            result,
            Err(StoreError::QueryFailed("ThrottlingException".into()))
        );
        assert_eq!(store.describe_calls(), 1);
    }
}
