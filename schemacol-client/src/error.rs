//! Error types for the schemacol binary.

use crate::api_client::ApiClientError;
use crate::config::ConfigError;
use schemacol_core::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
}
