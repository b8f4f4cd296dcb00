pub mod config;
pub mod error;
pub mod log;
pub mod plan;
pub mod traits;
pub mod types;

pub use config::{AppConfig, ExecutorConfig, ProviderConfig};
pub use error::{AdweaveError, Result};
pub use log::TaskLogger;
pub use plan::{Plan, PlanNode};
pub use types::*;
