use std::path::PathBuf;

use super::{
    Configs,
    loaders::{environment::*, file::existing_file},
};
use crate::error::SsmEnvError;

/// Session settings for the SSM client.
///
/// Values left as `None` fall through to the AWS SDK default chain
/// (environment, shared config files, instance metadata).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SsmStorageConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub assume_role_arn: Option<String>,
    pub config_file: Option<PathBuf>,
    pub credentials_file: Option<PathBuf>,
}

impl Configs for SsmStorageConfig {
    fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(SsmStorageConfig {
            region: optional_env("AWS_REGION"),
            profile: optional_env("AWS_PROFILE"),
            endpoint_url: first_env(&["AWS_ENDPOINT", "SSM_ENDPOINT"]),
            ..Default::default()
        })
    }
}

// Setters keep the current value when given `None`, so command line flags
// only override what the environment provided when they are present.
impl SsmStorageConfig {
    pub fn set_region(mut self, region: Option<String>) -> Self {
        self.region = region.or(self.region);
        self
    }

    pub fn set_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile.or(self.profile);
        self
    }

    pub fn set_endpoint_url(mut self, endpoint_url: Option<String>) -> Self {
        self.endpoint_url = endpoint_url.or(self.endpoint_url);
        self
    }

    pub fn set_static_credentials(
        mut self,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        session_token: Option<String>,
    ) -> Self {
        self.access_key_id = access_key_id.or(self.access_key_id);
        self.secret_access_key = secret_access_key.or(self.secret_access_key);
        self.session_token = session_token.or(self.session_token);
        self
    }

    pub fn set_assume_role_arn(mut self, assume_role_arn: Option<String>) -> Self {
        self.assume_role_arn = assume_role_arn.or(self.assume_role_arn);
        self
    }

    pub fn set_config_file(mut self, config_file: Option<PathBuf>) -> Self {
        self.config_file = config_file.or(self.config_file);
        self
    }

    pub fn set_credentials_file(mut self, credentials_file: Option<PathBuf>) -> Self {
        self.credentials_file = credentials_file.or(self.credentials_file);
        self
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }

    pub fn validate(&self) -> Result<(), SsmEnvError> {
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(SsmEnvError::configuration(
                "--access-key and --secret-key must be given together",
            ));
        }

        if self.session_token.is_some() && !self.has_static_credentials() {
            return Err(SsmEnvError::configuration(
                "--token requires --access-key and --secret-key",
            ));
        }

        for path in [&self.config_file, &self.credentials_file].into_iter().flatten() {
            existing_file(path).map_err(SsmEnvError::Configuration)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for SsmStorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmStorageConfig")
            .field("region", &self.region)
            .field("profile", &self.profile)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("assume_role_arn", &self.assume_role_arn)
            .field("config_file", &self.config_file)
            .field("credentials_file", &self.credentials_file)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn test_load_from_environment() {
        unsafe {
            std::env::set_var("AWS_REGION", "eu-west-1");
            std::env::remove_var("AWS_PROFILE");
            std::env::remove_var("AWS_ENDPOINT");
            std::env::set_var("SSM_ENDPOINT", "http://localhost:4566");
        }

        let config = SsmStorageConfig::load().unwrap();

        unsafe {
            std::env::remove_var("AWS_REGION");
            std::env::remove_var("SSM_ENDPOINT");
        }

        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.profile, None);
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_setters_only_override_when_present() {
        let config = SsmStorageConfig {
            region: Some("eu-west-1".to_string()),
            profile: Some("dev".to_string()),
            ..Default::default()
        }
        .set_region(Some("us-east-1".to_string()))
        .set_profile(None);

        assert_eq!(config.region.as_deref(), Some("us-east-1"));
        assert_eq!(config.profile.as_deref(), Some("dev"));
    }

    #[test]
    fn test_validate_requires_key_pairs() {
        let config = SsmStorageConfig::default().set_static_credentials(
            Some("AKIA".to_string()),
            None,
            None,
        );
        assert!(matches!(
            config.validate(),
            Err(SsmEnvError::Configuration(_))
        ));

        let config = SsmStorageConfig::default().set_static_credentials(
            None,
            None,
            Some("token".to_string()),
        );
        assert!(config.validate().is_err());

        let config = SsmStorageConfig::default().set_static_credentials(
            Some("AKIA".to_string()),
            Some("secret".to_string()),
            Some("token".to_string()),
        );
        assert!(config.validate().is_ok());
        assert!(config.has_static_credentials());
    }

    #[test]
    fn test_validate_checks_profile_files() {
        let config_file = NamedTempFile::new().unwrap();

        let config =
            SsmStorageConfig::default().set_config_file(Some(config_file.path().to_path_buf()));
        assert!(config.validate().is_ok());

        let config = config.set_credentials_file(Some(PathBuf::from("/nonexistent/credentials")));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/credentials"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = SsmStorageConfig::default().set_static_credentials(
            Some("AKIA".to_string()),
            Some("very-secret".to_string()),
            None,
        );

        let rendered = format!("{config:?}");
        assert!(rendered.contains("AKIA"));
        assert!(!rendered.contains("very-secret"));
    }
}
