//! Configuration management for gwadm.
//!
//! The configuration lives as YAML in the platform config directory
//! (`~/.config/gwadm/config.yml` on Linux), overridable with the
//! `GWADM_CONFIG_DIR` environment variable. It carries the Workspace
//! customer identity, the OAuth client credentials, and the retry/batch
//! policy knobs.

use crate::format::{Formattable, FormattingError, OutputFormat};
use crate::gapi::RetryPolicy;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};
use tracing::debug;

pub const DEFAULT_APPLICATION_ID: &str = "gwadm";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIG_DIR_ENV_VAR: &str = "GWADM_CONFIG_DIR";
pub const DEFAULT_CUSTOMER_ID: &str = "my_customer";
pub const DEFAULT_NUM_THREADS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause:?}")]
    FailedToLoadData { cause: Box<dyn std::error::Error> },
    #[error("failed to write configuration data to file, because of: {cause:?}")]
    FailedToWriteData { cause: Box<dyn std::error::Error> },
    #[error("missing value for property {name:?}")]
    MissingRequiredPropertyValue { name: String },
    #[error("unknown configuration property {name:?}")]
    UnknownProperty { name: String },
    #[error("invalid value for property {name:?}: {value:?}")]
    InvalidPropertyValue { name: String, value: String },
}

fn default_customer_id() -> String {
    DEFAULT_CUSTOMER_ID.to_string()
}

fn default_num_threads() -> usize {
    DEFAULT_NUM_THREADS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Workspace customer id; `my_customer` targets the authorized account.
    #[serde(default = "default_customer_id")]
    customer_id: String,
    /// Restricts listings to one domain instead of the whole customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    /// Worker pool size for batch fan-out.
    #[serde(default = "default_num_threads")]
    num_threads: usize,
    /// Retry attempt ceiling override for the API call wrapper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_retries: Option<u32>,
    /// Backoff delay cap override, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backoff_cap_secs: Option<u64>,
    /// Directory API base URL override, for testing against a mock server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    /// Token endpoint override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_url: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            customer_id: default_customer_id(),
            domain: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            num_threads: default_num_threads(),
            max_retries: None,
            backoff_cap_secs: None,
            api_base_url: None,
            token_url: None,
        }
    }
}

impl Configuration {
    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV_VAR) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(configuration_directory) => {
                let mut default_config_file_path = configuration_directory;
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        debug!("Loading configuration from {:?}...", default_file_path);
        Configuration::load_from_file(default_file_path)
    }

    /// Load the default configuration, creating one if none exists yet.
    pub fn load_or_create_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        match Configuration::load_from_file(default_file_path.clone()) {
            Ok(config) => Ok(config),
            Err(ConfigurationError::FailedToLoadData { cause })
                if cause
                    .downcast_ref::<std::io::Error>()
                    .map(|e| e.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false) =>
            {
                debug!("Configuration file not found, creating default configuration");
                let default_config = Configuration::default();
                default_config.save(&default_file_path)?;
                Ok(default_config)
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_from_file(path: PathBuf) -> Result<Configuration, ConfigurationError> {
        let content = fs::read_to_string(path)
            .map_err(|cause| ConfigurationError::FailedToLoadData {
                cause: Box::new(cause),
            })?;
        serde_yaml::from_str(&content).map_err(|cause| ConfigurationError::FailedToLoadData {
            cause: Box::new(cause),
        })
    }

    pub fn write(&self, writer: Box<dyn Write>) -> Result<(), ConfigurationError> {
        serde_yaml::to_writer(writer, self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn save(&self, path: &PathBuf) -> Result<(), ConfigurationError> {
        let configuration_directory = path
            .parent()
            .ok_or(ConfigurationError::FailedToFindConfigurationDirectory)?;
        fs::create_dir_all(configuration_directory)
            .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?;

        let file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        self.write(Box::new(file))
    }

    pub fn save_to_default(&self) -> Result<(), ConfigurationError> {
        self.save(&Self::get_default_configuration_file_path()?)
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads.max(1)
    }

    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    pub fn token_url(&self) -> Option<&str> {
        self.token_url.as_deref()
    }

    /// The OAuth client triple, or an error naming the first missing piece.
    pub fn credentials(&self) -> Result<(String, String, String), ConfigurationError> {
        let require = |value: &Option<String>, name: &str| {
            value
                .clone()
                .ok_or_else(|| ConfigurationError::MissingRequiredPropertyValue {
                    name: name.to_string(),
                })
        };
        Ok((
            require(&self.client_id, "client_id")?,
            require(&self.client_secret, "client_secret")?,
            require(&self.refresh_token, "refresh_token")?,
        ))
    }

    /// The retry policy with any configured overrides applied.
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::default();
        if let Some(max_retries) = self.max_retries {
            policy.max_attempts = max_retries.max(1);
        }
        if let Some(cap) = self.backoff_cap_secs {
            policy.cap = Duration::from_secs(cap);
        }
        policy
    }

    /// Sets one property by name, as used by `gwadm config set`.
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<(), ConfigurationError> {
        let invalid = |name: &str, value: &str| ConfigurationError::InvalidPropertyValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "customer_id" => self.customer_id = value.to_string(),
            "domain" => self.domain = Some(value.to_string()),
            "client_id" => self.client_id = Some(value.to_string()),
            "client_secret" => self.client_secret = Some(value.to_string()),
            "refresh_token" => self.refresh_token = Some(value.to_string()),
            "api_base_url" => self.api_base_url = Some(value.to_string()),
            "token_url" => self.token_url = Some(value.to_string()),
            "num_threads" => {
                self.num_threads = value.parse().map_err(|_| invalid(name, value))?;
            }
            "max_retries" => {
                self.max_retries = Some(value.parse().map_err(|_| invalid(name, value))?);
            }
            "backoff_cap_secs" => {
                self.backoff_cap_secs = Some(value.parse().map_err(|_| invalid(name, value))?);
            }
            _ => {
                return Err(ConfigurationError::UnknownProperty {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl Formattable for Configuration {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Json(options) => {
                // The client secret and refresh token stay out of printed output.
                let mut redacted = self.clone();
                redacted.client_secret = redacted.client_secret.map(|_| "********".to_string());
                redacted.refresh_token = redacted.refresh_token.map(|_| "********".to_string());
                if options.pretty {
                    Ok(serde_json::to_string_pretty(&redacted)?)
                } else {
                    Ok(serde_json::to_string(&redacted)?)
                }
            }
            OutputFormat::Csv(options) => {
                let row = format!(
                    "{},{},{}",
                    self.customer_id,
                    self.domain.clone().unwrap_or_default(),
                    self.num_threads
                );
                if options.with_headers {
                    Ok(format!("CUSTOMER_ID,DOMAIN,NUM_THREADS\n{row}"))
                } else {
                    Ok(row)
                }
            }
        }
    }
}
