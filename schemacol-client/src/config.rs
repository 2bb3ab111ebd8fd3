//! Configuration loading for the schema column client.
//!
//! Every field is optional. Without a config file the client talks to the
//! default endpoint using the current wire revision.

use schemacol_core::WireRevision;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Base URL used when neither `api_base_url` nor `api_origin` is set.
pub const DEFAULT_BASE_URL: &str = "https://www.alfaeorders.com:19443/erpapi/panel";

/// Path appended to an origin to form the base URL.
pub const BASE_PATH_SUFFIX: &str = "/erpapi/panel";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SCHEMACOL_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Full base URL, used verbatim.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Origin only; [`BASE_PATH_SUFFIX`] is appended.
    #[serde(default)]
    pub api_origin: Option<String>,
    #[serde(default)]
    pub wire_revision: WireRevision,
    /// Per-request timeout. Absent means the transport default.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,
    #[serde(default)]
    pub log_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ClientConfig {
    /// Load from `explicit` (the `--config` flag) or `SCHEMACOL_CONFIG`,
    /// falling back to defaults when neither is given.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit.map(Path::to_path_buf).or_else(config_path_from_env) {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_some() && self.api_origin.is_some() {
            return Err(ConfigError::InvalidValue {
                field: "api_origin",
                reason: "set either api_base_url or api_origin, not both".to_string(),
            });
        }
        if let Some(url) = &self.api_base_url {
            validate_url("api_base_url", url)?;
        }
        if let Some(origin) = &self.api_origin {
            validate_url("api_origin", origin)?;
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "log_filter",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// The base URL every request is built from.
    pub fn base_url(&self) -> String {
        match (&self.api_base_url, &self.api_origin) {
            (Some(url), _) => url.trim().trim_end_matches('/').to_string(),
            (None, Some(origin)) => base_url_for_origin(origin),
            (None, None) => DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// `origin` with the fixed API path appended.
pub fn base_url_for_origin(origin: &str) -> String {
    format!("{}{}", origin.trim().trim_end_matches('/'), BASE_PATH_SUFFIX)
}

/// Reject empty URLs and anything that is not http(s).
pub(crate) fn validate_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("'{}' must start with http:// or https://", url),
        });
    }
    Ok(())
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}
