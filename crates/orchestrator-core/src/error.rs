use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("invalid port '{0}': expected an integer between 0 and 65535")]
    InvalidPort(String),

    #[error("invalid {name} '{value}': must be an http:// or https:// URL")]
    InvalidUrl { name: &'static str, value: String },

    #[error("invalid timeout for {name}: must be greater than zero")]
    InvalidTimeout { name: &'static str },

    #[error("Acquire no devolvió dataId/features válidos")]
    BadAcquireResponse,
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
