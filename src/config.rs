use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ClientConfig;
use crate::api::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::auth::Credentials;

pub const CONFIG_FILE: &str = "config.toml";
pub const CREDENTIALS_FILE: &str = "cthru_api";
pub const LOG_FILE: &str = "cthru.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Portal root, e.g. `https://cthru.data.socrata.com`
    pub base_url: String,
    pub timeout_secs: u64,
    /// Rows requested when `--limit` is not given
    pub default_limit: u32,
    /// Credential file; defaults to `cthru_api` in the config directory
    pub credentials_file: Option<PathBuf>,
    /// Where `--save-json` snapshots go; defaults to the working directory
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_limit: 100,
            credentials_file: None,
            snapshot_dir: None,
        }
    }
}

impl Config {
    /// Where config, credentials and the log file live. Nothing is created.
    pub fn config_dir() -> Option<PathBuf> {
        if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir().map(|dir| dir.join("cthru"))
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir().map(|dir| dir.join(".cthru"))
        }
    }

    /// [`Config::config_dir`], created if missing. Only needed before writing into it.
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir().context("Failed to locate a config directory")?;

        if !config_dir.is_dir() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Load from the default location; no usable location yields the defaults
    pub fn load() -> Result<Self> {
        match Self::get_config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            anyhow::bail!("default_limit must be greater than zero");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://, got '{}'", self.base_url);
        }
        Ok(())
    }

    pub fn default_limit(&self) -> NonZeroU32 {
        NonZeroU32::new(self.default_limit).unwrap_or(crate::api::query::filter_spec::DEFAULT_LIMIT)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn credentials_path(&self) -> Option<PathBuf> {
        match &self.credentials_file {
            Some(path) => Some(path.clone()),
            None => Self::config_dir().map(|dir| dir.join(CREDENTIALS_FILE)),
        }
    }

    /// Credentials from the configured file plus environment overrides.
    /// Without a credential path only the environment is consulted.
    pub fn credentials(&self) -> Credentials {
        match self.credentials_path() {
            Some(path) => Credentials::load(&path),
            None => {
                warn!("No credential file location available");
                Credentials::from_env()
            }
        }
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
