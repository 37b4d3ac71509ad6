pub mod config;
pub mod error;
pub mod json;
pub mod pipeline;
pub mod readiness;
pub mod types;

pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, Result};
