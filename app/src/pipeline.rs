use tracing::{debug, info};

use crate::{
    catalog::ParameterCatalog,
    domain::{ParameterName, ParameterType},
    environment::EnvironmentSnapshot,
    error::SsmEnvError,
    filters::{FilterBuilder, split_csv},
    output::{FormatOptions, OutputFormatter, OutputLine},
    resolver::ValueResolver,
    storage::repository::ParameterStore,
};

/// Everything one invocation asks for, independent of how it was parsed.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub filters: FilterBuilder,
    pub multi_values: Vec<String>,
    pub options: FormatOptions,
}

impl ExportRequest {
    pub fn new(filters: FilterBuilder) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn multi_values<S: AsRef<str>>(mut self, multi_values: &[S]) -> Self {
        self.multi_values.extend(split_csv(multi_values));
        self
    }

    pub fn options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }
}

/// Describes, resolves and formats the parameters selected by `request`.
///
/// Nothing is returned unless every step succeeds, so a collision under
/// [`CollisionPolicy::Fail`](crate::output::CollisionPolicy::Fail) leaves no
/// partial output behind.
pub async fn export<S: ParameterStore + ?Sized>(
    store: &S,
    request: &ExportRequest,
    snapshot: &EnvironmentSnapshot,
) -> Result<Vec<OutputLine>, SsmEnvError> {
    let specs = request.filters.build()?;
    if specs.is_empty() {
        info!("No names, paths or tags given, nothing to export");
        return Ok(Vec::new());
    }

    let metadata = ParameterCatalog::new(store).describe_all(&specs).await?;
    let secure = metadata
        .iter()
        .filter(|m| m.parameter_type() == ParameterType::SecureString)
        .count();
    info!(count = metadata.len(), secure, "Matched parameters");

    let names: Vec<ParameterName> = metadata.into_iter().map(|m| m.into_name()).collect();
    let values = ValueResolver::new(store).resolve(&names).await?;
    for value in &values {
        debug!(
            parameter = value.name().as_str(),
            parameter_type = %value.parameter_type(),
            "Resolved parameter value"
        );
    }

    let formatter = OutputFormatter::new(snapshot, request.multi_values.clone(), request.options);
    formatter.format(&values)
}

/// [`export`] rendered as shell lines.
pub async fn export_lines<S: ParameterStore + ?Sized>(
    store: &S,
    request: &ExportRequest,
    snapshot: &EnvironmentSnapshot,
) -> Result<Vec<String>, SsmEnvError> {
    let lines = export(store, request, snapshot).await?;
    Ok(lines
        .iter()
        .map(|line| line.render(request.options.export))
        .collect())
}
