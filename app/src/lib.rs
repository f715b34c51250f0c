pub mod catalog;
pub mod configs;
pub mod domain;
pub mod environment;
pub mod error;
pub mod filters;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod storage;

pub use error::SsmEnvError;
pub use pipeline::{ExportRequest, export, export_lines};
