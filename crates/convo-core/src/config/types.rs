use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request header the credential travels in
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub credential_file: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Where interactive sessions write their log
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_auth_header() -> String {
    "x-auth-token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("convo.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_header: default_auth_header(),
            timeout_secs: default_timeout_secs(),
            credential_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        let header_ok = !self.auth_header.is_empty()
            && self
                .auth_header
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !header_ok {
            return Err(ConfigError::Invalid(format!(
                "auth_header is not a valid header name: '{}'",
                self.auth_header
            )));
        }

        Ok(())
    }

    /// Credential file from the config, or `<config dir>/convo/credential`.
    pub fn credential_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.credential_file {
            return Ok(path.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join("convo").join("credential"))
            .ok_or_else(|| {
                ConfigError::Invalid(
                    "no config directory available; set credential_file".to_string(),
                )
            })
    }
}
