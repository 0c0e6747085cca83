use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use super::SeverityTable;

const ENV_CONFIG_PATH: &str = "RUNBOOK_IMPORTER_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_HOST: &str = "HOST";
const ENV_PORT: &str = "PORT";
const ENV_UPLOAD_DIR: &str = "UPLOAD_DIR";
const ENV_FULL_IMPORT: &str = "RUNBOOK_IMPORTER_FULL_IMPORT";

const ENV_RBA_RUNBOOK_ENDPOINT: &str = "RBA_RUNBOOK_ENDPOINT";
const ENV_RBA_TRIGGER_ENDPOINT: &str = "RBA_TRIGGER_ENDPOINT";
const ENV_RBA_API_AUTH_TYPE: &str = "RBA_API_AUTH_TYPE";
const ENV_RBA_API_KEY: &str = "RBA_API_KEY";

const ENV_CONVERSION_URL: &str = "OS_ALERTS_CONVERSION_URL";
const ENV_CONVERSION_AUTH: &str = "OS_ALERTS_CONVERSION_AUTH";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_RBA_AUTH_TYPE: &str = "Bearer";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid URL in {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Remote runbook automation (RBA) API settings
#[derive(Debug, Clone)]
pub struct RbaConfig {
    pub runbook_endpoint: Url,
    pub trigger_endpoint: Url,
    /// Scheme placed before the key in the `Authorization` header
    pub auth_type: String,
    pub api_key: String,
}

impl RbaConfig {
    pub fn authorization(&self) -> String {
        format!("{} {}", self.auth_type, self.api_key)
    }
}

/// Object Server class-conversion API settings
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub url: Url,
    /// Pre-encoded Basic credentials
    pub auth: String,
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub severities: Option<SeverityTable>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory that receives per-request scratch folders
    pub upload_dir: PathBuf,
    pub severities: SeverityTable,
    /// Run runbook and trigger creation after parsing
    pub full_import: bool,
    pub rba: Option<RbaConfig>,
    pub conversion: Option<ConversionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_dir: std::env::temp_dir(),
            severities: SeverityTable::default(),
            full_import: false,
            rba: None,
            conversion: None,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var(ENV_PORT) {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_PORT,
                value: p,
            })?,
            None => DEFAULT_PORT,
        };

        let host = var(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let upload_dir = var(ENV_UPLOAD_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let full_import = match var(ENV_FULL_IMPORT) {
            Some(v) => parse_flag(&v).ok_or(ConfigError::InvalidValue {
                name: ENV_FULL_IMPORT,
                value: v,
            })?,
            None => false,
        };

        let rba = remote_setting(full_import, Self::rba_from(&var))?;
        let conversion = remote_setting(full_import, Self::conversion_from(&var))?;

        if full_import {
            if rba.is_none() {
                return Err(ConfigError::Missing(ENV_RBA_RUNBOOK_ENDPOINT));
            }
            if conversion.is_none() {
                return Err(ConfigError::Missing(ENV_CONVERSION_URL));
            }
        }

        let config_path = var(ENV_CONFIG_PATH).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let severities = Self::load_config_file(&config_path)
            .and_then(|cf| cf.severities)
            .filter(|table| !table.is_empty())
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            upload_dir,
            severities,
            full_import,
            rba,
            conversion,
        })
    }

    /// RBA settings are either complete or absent
    fn rba_from<F>(var: &F) -> Result<Option<RbaConfig>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(runbook_endpoint) = var(ENV_RBA_RUNBOOK_ENDPOINT) else {
            return Ok(None);
        };

        let trigger_endpoint =
            var(ENV_RBA_TRIGGER_ENDPOINT).ok_or(ConfigError::Missing(ENV_RBA_TRIGGER_ENDPOINT))?;
        let api_key = var(ENV_RBA_API_KEY).ok_or(ConfigError::Missing(ENV_RBA_API_KEY))?;

        Ok(Some(RbaConfig {
            runbook_endpoint: parse_url(ENV_RBA_RUNBOOK_ENDPOINT, &runbook_endpoint)?,
            trigger_endpoint: parse_url(ENV_RBA_TRIGGER_ENDPOINT, &trigger_endpoint)?,
            auth_type: var(ENV_RBA_API_AUTH_TYPE)
                .unwrap_or_else(|| DEFAULT_RBA_AUTH_TYPE.to_string()),
            api_key,
        }))
    }

    fn conversion_from<F>(var: &F) -> Result<Option<ConversionConfig>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(url) = var(ENV_CONVERSION_URL) else {
            return Ok(None);
        };

        let auth = var(ENV_CONVERSION_AUTH).ok_or(ConfigError::Missing(ENV_CONVERSION_AUTH))?;

        Ok(Some(ConversionConfig {
            url: parse_url(ENV_CONVERSION_URL, &url)?,
            auth,
        }))
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Incomplete remote settings only matter while the full import is enabled
fn remote_setting<T>(
    full_import: bool,
    setting: Result<Option<T>, ConfigError>,
) -> Result<Option<T>, ConfigError> {
    match setting {
        Err(ConfigError::Missing(name)) if !full_import => {
            tracing::warn!(
                missing = name,
                "Ignoring incomplete remote settings, full import is disabled"
            );
            Ok(None)
        }
        other => other,
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
