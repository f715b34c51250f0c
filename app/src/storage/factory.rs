use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    configs::SsmStorageConfig,
    error::SsmEnvError,
    storage::{adapters::ssm_storage::SsmStorage, repository::ParameterStore},
};

pub struct ParameterStoreFactory {
    config: SsmStorageConfig,
}

impl ParameterStoreFactory {
    pub fn new(config: SsmStorageConfig) -> Self {
        Self { config }
    }

    pub async fn create(&self) -> Result<Arc<dyn ParameterStore>, SsmEnvError> {
        self.config.validate()?;
        debug!("SSM CONFIGS: {:?}", &self.config);

        let ssm = SsmStorage::new(self.config.clone()).await.map_err(|e| {
            error!("Failed to initialize SSM client: {}", e);
            SsmEnvError::Remote(e)
        })?;

        Ok(Arc::new(ssm))
    }
}
