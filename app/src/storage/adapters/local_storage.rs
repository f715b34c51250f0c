use std::sync::Mutex;

use crate::domain::*;
use crate::filters::{FilterSpec, ParameterFilter, TagFilter};
use crate::storage::repository::*;

const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_BATCH_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredParameter {
    name: ParameterName,
    parameter_type: ParameterType,
    value: String,
    tags: Vec<(String, String)>,
}

impl StoredParameter {
    pub fn new(
        name: impl Into<ParameterName>,
        parameter_type: ParameterType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            value: value.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    fn matches(&self, spec: &FilterSpec) -> bool {
        spec.types().contains(&self.parameter_type)
            && spec.filters().iter().all(|filter| self.matches_filter(filter))
    }

    fn matches_filter(&self, filter: &ParameterFilter) -> bool {
        let name = self.name.as_str();
        match filter {
            ParameterFilter::Names(names) => names.iter().any(|n| n == name),
            ParameterFilter::Paths { paths, recursive } => paths
                .iter()
                .any(|path| is_under_path(name, path, *recursive)),
            ParameterFilter::Tag(tag) => self.matches_tag(tag),
        }
    }

    fn matches_tag(&self, tag: &TagFilter) -> bool {
        self.tags.iter().any(|(key, value)| {
            key == tag.key() && (tag.values().is_empty() || tag.values().contains(value))
        })
    }

    fn to_metadata(&self) -> ParameterMetadata {
        ParameterMetadata::new(self.name.clone(), self.parameter_type)
    }

    fn to_value(&self) -> ParameterValue {
        ParameterValue::new(self.name.clone(), self.parameter_type, self.value.clone())
    }
}

/// Hierarchy match the way the parameter store evaluates `Path` filters:
/// one level only matches direct children, recursive matches any descendant.
fn is_under_path(name: &str, path: &str, recursive: bool) -> bool {
    let prefix = format!("{}/", path.trim_end_matches('/'));
    match name.strip_prefix(prefix.as_str()) {
        Some(rest) if !rest.is_empty() => recursive || !rest.contains('/'),
        _ => false,
    }
}

/// In-memory parameter store. Evaluates filters locally and paginates the
/// describe results, which makes it a stand-in for the remote store in tests.
#[derive(Debug)]
pub struct LocalStorage {
    parameters: Vec<StoredParameter>,
    page_size: usize,
    batch_limit: usize,
    failure: Option<StoreError>,
    describe_calls: Mutex<usize>,
    get_batches: Mutex<Vec<Vec<ParameterName>>>,
}

impl LocalStorage {
    pub fn with_parameters(parameters: Vec<StoredParameter>) -> Self {
        Self {
            parameters,
            page_size: DEFAULT_PAGE_SIZE,
            batch_limit: DEFAULT_BATCH_LIMIT,
            failure: None,
            describe_calls: Mutex::new(0),
            get_batches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit.max(1);
        self
    }

    /// Every call fails with `error`.
    pub fn with_failure(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn describe_calls(&self) -> usize {
        *self
            .describe_calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Names requested by each `get_parameters` call, in call order.
    pub fn get_batches(&self) -> Vec<Vec<ParameterName>> {
        self.get_batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ParameterStore for LocalStorage {
    fn max_batch_size(&self) -> usize {
        self.batch_limit
    }

    async fn describe_parameters(
        &self,
        filter: &FilterSpec,
        next_token: Option<&str>,
    ) -> Result<DescribePage, StoreError> {
        *self
            .describe_calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        self.check_failure()?;

        let offset = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| StoreError::QueryFailed(format!("Invalid next token: {token}")))?,
            None => 0,
        };

        let matching: Vec<&StoredParameter> =
            self.parameters.iter().filter(|p| p.matches(filter)).collect();

        let end = (offset + self.page_size).min(matching.len());
        let page = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|p| p.to_metadata())
            .collect();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(DescribePage::new(page, next_token))
    }

    async fn get_parameters(&self, names: &[ParameterName]) -> Result<ParameterBatch, StoreError> {
        self.get_batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(names.to_vec());
        self.check_failure()?;

        if names.len() > self.batch_limit {
            return Err(StoreError::QueryFailed(format!(
                "At most {} names per request, got {}",
                self.batch_limit,
                names.len()
            )));
        }

        let mut batch = ParameterBatch::default();
        for name in names {
            match self.parameters.iter().find(|p| &p.name == name) {
                Some(stored) => batch.parameters.push(stored.to_value()),
                None => batch.invalid_names.push(name.to_string()),
            }
        }
        Ok(batch)
    }
}
