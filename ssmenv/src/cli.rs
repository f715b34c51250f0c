use std::path::PathBuf;

use app::{
    ExportRequest,
    configs::SsmStorageConfig,
    filters::FilterBuilder,
    output::{CollisionPolicy, FormatOptions},
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ssmenv",
    version,
    about = "Expand environment variables from AWS Systems Manager Parameter Store",
    long_about = None
)]
pub struct Args {
    /// Names of the parameters (comma separated)
    #[arg(long, value_name = "PARAM_NAME,...")]
    pub names: Vec<String>,

    /// The hierarchy for the parameter names (comma separated)
    #[arg(long, value_name = "PARAM_PATH,...")]
    pub paths: Vec<String>,

    /// Filter by tags (comma separated)
    #[arg(long, value_name = "KEY=VALUE,...")]
    pub tags: Vec<String>,

    /// The type of parameters (comma separated)
    #[arg(long, value_name = "TYPE,...", default_value = "String,SecureString")]
    pub types: Vec<String>,

    /// Names of parameters holding several `NAME=VALUE` lines (comma separated)
    #[arg(long, value_name = "PARAM_NAME,...")]
    pub multi_values: Vec<String>,

    /// Describe one level of each path only
    #[arg(long)]
    pub non_recursive: bool,

    /// Print `NAME="VALUE"` instead of `export NAME="VALUE"`
    #[arg(long)]
    pub without_export: bool,

    /// Hide variables that already exist in the environment
    #[arg(long)]
    pub hide_exists: bool,

    /// Fail if a variable already exists in the environment
    #[arg(long)]
    pub fail_exists: bool,

    /// The AWS access key ID
    #[arg(long)]
    pub access_key: Option<String>,

    /// The AWS secret access key
    #[arg(long)]
    pub secret_key: Option<String>,

    /// The AWS assume role ARN
    #[arg(long)]
    pub assume_role_arn: Option<String>,

    /// The AWS session token
    #[arg(long)]
    pub token: Option<String>,

    /// The AWS region
    #[arg(long)]
    pub region: Option<String>,

    /// The AWS CLI profile
    #[arg(long)]
    pub profile: Option<String>,

    /// The AWS CLI config file
    #[arg(long, value_name = "PATH")]
    pub aws_config: Option<PathBuf>,

    /// The AWS CLI credentials file
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Custom SSM endpoint (e.g., http://localhost:4566)
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,
}

impl Args {
    pub fn export_request(&self) -> ExportRequest {
        let filters = FilterBuilder::new()
            .names(&self.names)
            .paths(&self.paths)
            .tags(&self.tags)
            .types(&self.types)
            .recursive(!self.non_recursive);

        ExportRequest::new(filters)
            .multi_values(&self.multi_values)
            .options(FormatOptions {
                export: !self.without_export,
                collision: CollisionPolicy::from_flags(self.hide_exists, self.fail_exists),
            })
    }

    /// Applies the session flags on top of `base`.
    pub fn storage_config(&self, base: SsmStorageConfig) -> SsmStorageConfig {
        base.set_region(self.region.clone())
            .set_profile(self.profile.clone())
            .set_endpoint_url(self.endpoint_url.clone())
            .set_static_credentials(
                self.access_key.clone(),
                self.secret_key.clone(),
                self.token.clone(),
            )
            .set_assume_role_arn(self.assume_role_arn.clone())
            .set_config_file(self.aws_config.clone())
            .set_credentials_file(self.credentials.clone())
    }
}
