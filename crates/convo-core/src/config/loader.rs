use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::types::{ClientConfig, ConfigError};

pub const ENV_BASE_URL: &str = "CONVO_BASE_URL";
pub const ENV_AUTH_HEADER: &str = "CONVO_AUTH_HEADER";
pub const ENV_TIMEOUT_SECS: &str = "CONVO_TIMEOUT_SECS";
pub const ENV_CREDENTIAL_FILE: &str = "CONVO_CREDENTIAL_FILE";

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// `<config dir>/convo/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("convo").join("config.yaml"))
    }

    /// Load from `path` when given (it must exist), otherwise from the default
    /// location when present, otherwise defaults. Environment overrides apply
    /// in every case.
    pub async fn load(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_file(path).await?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => Self::read_file(&default).await?,
                None => {
                    log::debug!("No config file found, using defaults");
                    ClientConfig::default()
                }
            },
        };

        Self::apply_env(&mut config, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
        let config = Self::read_file(path.as_ref()).await?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_str(content: &str) -> Result<ClientConfig, ConfigError> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<ClientConfig, ConfigError> {
        log::info!("Loading configuration from file: {}", path.display());
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<ClientConfig, ConfigError> {
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override fields from variables resolved through `lookup`.
    pub fn apply_env<F>(config: &mut ClientConfig, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }

        if let Some(header) = lookup(ENV_AUTH_HEADER).filter(|v| !v.is_empty()) {
            config.auth_header = header;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            config.timeout_secs = timeout.parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_SECS, timeout))
            })?;
        }

        if let Some(file) = lookup(ENV_CREDENTIAL_FILE).filter(|v| !v.is_empty()) {
            config.credential_file = Some(PathBuf::from(file));
        }

        Ok(())
    }
}
