use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FetcherError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub etherscan: EtherscanConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EtherscanConfig {
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Sent as `chainid`; `0` drops the parameter for explorers that predate
    /// the multichain API
    #[serde(default = "default_chain_id")]
    pub chain_id: Option<u64>,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    pub input_file: PathBuf,
    /// Address list written by the proxy checker
    pub output_file: Option<PathBuf>,
    /// Root of the per-contract directories written by the contracts fetcher
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

/// What a pipeline does when one address fails
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the run at the failing address
    #[default]
    Abort,
    /// Log the failure and continue with the next address
    Skip,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            on_error: ErrorPolicy::default(),
        }
    }
}

fn default_api_url() -> String { "https://api.etherscan.io/v2/api".to_string() }
fn default_chain_id() -> Option<u64> { Some(1) }
fn default_requests_per_second() -> f64 { 5.0 }
fn default_request_timeout() -> u64 { 30 }
fn default_log_level() -> String { "info".to_string() }

impl Config {
    /// Load the config file, layered with `FETCHER__*` environment variables.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        // Load .env file first
        dotenv::dotenv().ok();

        let config_builder = config::Config::builder()
            .add_source(config::File::from(config_path.as_ref()))
            // e.g. FETCHER__ETHERSCAN__API_KEY
            .add_source(
                config::Environment::with_prefix("FETCHER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config_builder.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from an in-memory source, without environment overrides.
    pub fn from_content(content: &str, format: config::FileFormat) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(content, format))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let rps = self.etherscan.requests_per_second;
        if !rps.is_finite() || rps <= 0.0 {
            return Err(FetcherError::Config(format!(
                "requests_per_second must be a positive number, got {}",
                rps
            )));
        }

        if self.etherscan.api_url.trim().is_empty() {
            return Err(FetcherError::Config("etherscan.api_url is empty".to_string()));
        }

        Ok(())
    }

    /// `chainid` query value, `None` when set to `0`
    pub fn chain_id(&self) -> Option<u64> {
        self.etherscan.chain_id.filter(|id| *id != 0)
    }

    /// Fixed pause after every upstream call
    pub fn request_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.etherscan.requests_per_second)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.etherscan.request_timeout_seconds)
    }

    pub fn input_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.input_file)
    }

    pub fn output_file_path(&self) -> Result<PathBuf> {
        self.paths
            .output_file
            .as_ref()
            .map(|file| self.paths.data_dir.join(file))
            .ok_or_else(|| FetcherError::Config("paths.output_file not set".to_string()))
    }

    /// Taken as given, not joined onto `data_dir`.
    pub fn output_dir_path(&self) -> Result<PathBuf> {
        self.paths
            .output_dir
            .clone()
            .ok_or_else(|| FetcherError::Config("paths.output_dir not set".to_string()))
    }
}
