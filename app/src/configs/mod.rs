pub mod loaders;
pub mod storage;

pub use storage::SsmStorageConfig;

pub trait Configs: Sized {
    fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}
