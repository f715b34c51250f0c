use aws_config::{BehaviorVersion, sts::AssumeRoleProvider};
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_sdk_ssm::{
    Client,
    config::Credentials,
    error::DisplayErrorContext,
    types::{self as ssm, ParameterStringFilter},
};
use aws_types::region::Region;
use tracing::debug;

use crate::{
    configs::SsmStorageConfig,
    domain::{ParameterMetadata, ParameterName, ParameterType, ParameterValue},
    filters::{FilterSpec, ParameterFilter},
    storage::repository::{DescribePage, ParameterBatch, ParameterStore, StoreError},
};

const SESSION_NAME: &str = "ssmenv";
const DESCRIBE_PAGE_SIZE: i32 = 50;
const GET_PARAMETERS_LIMIT: usize = 10;

#[derive(Clone)]
pub struct SsmStorage {
    client: Client,
}

impl SsmStorage {
    pub async fn new(config: SsmStorageConfig) -> Result<Self, StoreError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        if let Some(files) = Self::env_config_files(&config) {
            loader = loader.profile_files(files);
        }

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                config.session_token.clone(),
                None,
                SESSION_NAME,
            ));
        }

        let shared_config = loader.load().await;
        if shared_config.region().is_none() {
            return Err(StoreError::ConnectionFailed(
                "No AWS region configured. Use --region or set AWS_REGION".to_string(),
            ));
        }

        let mut ssm_config = aws_sdk_ssm::config::Builder::from(&shared_config);

        if let Some(role_arn) = &config.assume_role_arn {
            debug!(role_arn = role_arn.as_str(), "Assuming role for SSM access");
            let provider = AssumeRoleProvider::builder(role_arn)
                .session_name(SESSION_NAME)
                .configure(&shared_config)
                .build()
                .await;
            ssm_config = ssm_config.credentials_provider(provider);
        }

        Ok(Self::with_client(Client::from_conf(ssm_config.build())))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Alternate config/credentials files. A file not overridden keeps its
    /// default location.
    fn env_config_files(config: &SsmStorageConfig) -> Option<EnvConfigFiles> {
        if config.config_file.is_none() && config.credentials_file.is_none() {
            return None;
        }

        let mut files = EnvConfigFiles::builder();
        match &config.config_file {
            Some(path) => files = files.with_file(EnvConfigFileKind::Config, path),
            None => files = files.include_default_config_file(true),
        }
        match &config.credentials_file {
            Some(path) => files = files.with_file(EnvConfigFileKind::Credentials, path),
            None => files = files.include_default_credentials_file(true),
        }
        Some(files.build())
    }

    fn build_filters(spec: &FilterSpec) -> Result<Vec<ParameterStringFilter>, StoreError> {
        let mut filters = Vec::with_capacity(spec.filters().len() + 1);

        for filter in spec.filters() {
            let built = match filter {
                ParameterFilter::Names(names) => ParameterStringFilter::builder()
                    .key("Name")
                    .option("Equals")
                    .set_values(Some(names.clone()))
                    .build(),
                ParameterFilter::Paths { paths, recursive } => ParameterStringFilter::builder()
                    .key("Path")
                    .option(if *recursive { "Recursive" } else { "OneLevel" })
                    .set_values(Some(paths.clone()))
                    .build(),
                ParameterFilter::Tag(tag) => {
                    let builder = ParameterStringFilter::builder().key(format!("tag:{}", tag.key()));
                    if tag.values().is_empty() {
                        builder.build()
                    } else {
                        builder.set_values(Some(tag.values().to_vec())).build()
                    }
                }
            };
            filters.push(built.map_err(|e| StoreError::QueryFailed(e.to_string()))?);
        }

        let types = spec.types().iter().map(|t| t.as_str().to_string()).collect();
        filters.push(
            ParameterStringFilter::builder()
                .key("Type")
                .set_values(Some(types))
                .build()
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?,
        );

        Ok(filters)
    }
}

impl std::fmt::Debug for SsmStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmStorage")
            .field("region", &self.client.config().region())
            .finish()
    }
}

fn convert_type(
    name: &str,
    parameter_type: Option<&ssm::ParameterType>,
) -> Result<ParameterType, StoreError> {
    match parameter_type {
        Some(ssm::ParameterType::String) => Ok(ParameterType::String),
        Some(ssm::ParameterType::SecureString) => Ok(ParameterType::SecureString),
        Some(ssm::ParameterType::StringList) => Ok(ParameterType::StringList),
        other => Err(StoreError::InvalidResponse(format!(
            "Parameter '{name}' has unsupported type {other:?}"
        ))),
    }
}

#[async_trait::async_trait]
impl ParameterStore for SsmStorage {
    fn max_batch_size(&self) -> usize {
        GET_PARAMETERS_LIMIT
    }

    async fn describe_parameters(
        &self,
        filter: &FilterSpec,
        next_token: Option<&str>,
    ) -> Result<DescribePage, StoreError> {
        debug!(
            dimension = %filter.dimension(),
            next_token = next_token.unwrap_or_default(),
            "Describing parameters in SSM"
        );

        let response = self
            .client
            .describe_parameters()
            .set_parameter_filters(Some(Self::build_filters(filter)?))
            .max_results(DESCRIBE_PAGE_SIZE)
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|err| {
                StoreError::QueryFailed(format!(
                    "Failed to describe parameters: {}",
                    DisplayErrorContext(&err)
                ))
            })?;

        let mut parameters = Vec::with_capacity(response.parameters().len());
        for metadata in response.parameters() {
            let name = metadata.name().ok_or_else(|| {
                StoreError::InvalidResponse("Parameter metadata without a name".to_string())
            })?;
            parameters.push(ParameterMetadata::new(
                name,
                convert_type(name, metadata.r#type())?,
            ));
        }

        Ok(DescribePage::new(
            parameters,
            response.next_token().map(str::to_string),
        ))
    }

    async fn get_parameters(&self, names: &[ParameterName]) -> Result<ParameterBatch, StoreError> {
        debug!(count = names.len(), "Fetching parameter values from SSM");

        let response = self
            .client
            .get_parameters()
            .set_names(Some(names.iter().map(|n| n.as_str().to_string()).collect()))
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| {
                StoreError::QueryFailed(format!(
                    "Failed to get parameters: {}",
                    DisplayErrorContext(&err)
                ))
            })?;

        let mut batch = ParameterBatch {
            parameters: Vec::with_capacity(response.parameters().len()),
            invalid_names: response.invalid_parameters().to_vec(),
        };

        for parameter in response.parameters() {
            let name = parameter.name().ok_or_else(|| {
                StoreError::InvalidResponse("Parameter without a name".to_string())
            })?;
            batch.parameters.push(ParameterValue::new(
                name,
                convert_type(name, parameter.r#type())?,
                parameter.value().unwrap_or_default(),
            ));
        }

        Ok(batch)
    }
}
