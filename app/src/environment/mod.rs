pub mod naming;
pub mod snapshot;

pub use naming::env_var_name;
pub use snapshot::EnvironmentSnapshot;
