//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; without any of them the storefront runs
//! fully offline against the bundled catalog.
//!
//! - `YAMMI_API_BASE_URL` - Remote API base URL (default: unset, remote calls disabled)
//! - `YAMMI_API_TIMEOUT_SECS` - Remote call timeout in seconds (default: 3)
//! - `YAMMI_PAGE_SIZE` - Catalog page size (default: 10)
//! - `YAMMI_DATA_DIR` - Directory holding the persisted cart (default: .yammi)
//! - `YAMMI_CATALOG_PATH` - JSON file with the static catalog (default: bundled catalog)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 3;
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_DATA_DIR: &str = ".yammi";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote API configuration
    pub api: ApiConfig,
    /// Number of products per catalog page
    pub page_size: usize,
    /// Directory holding the persisted cart blob
    pub data_dir: PathBuf,
    /// Static catalog file; `None` uses the bundled catalog
    pub catalog_path: Option<PathBuf>,
}

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the remote API; `None` disables every remote call
    pub base_url: Option<Url>,
    /// Timeout applied to every remote call
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let page_size = parse_page_size(&get_env_or_default(
            "YAMMI_PAGE_SIZE",
            &DEFAULT_PAGE_SIZE.to_string(),
        ))?;
        let data_dir = PathBuf::from(get_env_or_default("YAMMI_DATA_DIR", DEFAULT_DATA_DIR));
        let catalog_path = get_optional_env("YAMMI_CATALOG_PATH").map(PathBuf::from);

        Ok(Self {
            api,
            page_size,
            data_dir,
            catalog_path,
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_optional_env("YAMMI_API_BASE_URL")
            .map(|raw| parse_base_url(&raw))
            .transpose()?;
        let timeout = parse_timeout(&get_env_or_default(
            "YAMMI_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        ))?;

        Ok(Self { base_url, timeout })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse the API base URL. Only `http` and `https` are accepted.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("YAMMI_API_BASE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "YAMMI_API_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("YAMMI_API_TIMEOUT_SECS".to_string(), e.to_string())
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "YAMMI_API_TIMEOUT_SECS".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_page_size(raw: &str) -> Result<usize, ConfigError> {
    let size = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar("YAMMI_PAGE_SIZE".to_string(), e.to_string()))?;
    if size == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "YAMMI_PAGE_SIZE".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(size)
}
