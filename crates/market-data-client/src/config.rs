//! Client configuration: upstream origins, timeout and user agent.
//!
//! Values resolve in three layers, later layers winning:
//! 1. Built-in defaults (public API origins, 30s timeout)
//! 2. TOML config file (`--config`, or the first discovered location)
//! 3. CLI flags / environment variables
//!
//! Discovered locations, in precedence order:
//! 1. `./.market-data-mcp.toml` (project-local)
//! 2. `~/.config/market-data-mcp.toml` (user-global)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_DEFILLAMA_URL: &str = "https://api.llama.fi";
pub const DEFAULT_STABLECOINS_URL: &str = "https://stablecoins.llama.fi";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILENAME: &str = ".market-data-mcp.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "market-data-mcp.toml";

fn default_user_agent() -> String {
    format!("market-data-mcp/{}", env!("CARGO_PKG_VERSION"))
}

/// Resolved configuration for [`crate::RestMarketDataClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// General market-data origin (CoinGecko API v3).
    pub coingecko_url: String,
    /// DeFi aggregation origin (DefiLlama).
    pub defillama_url: String,
    /// Stablecoin origin (DefiLlama stablecoins).
    pub stablecoins_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            coingecko_url: DEFAULT_COINGECKO_URL.to_string(),
            defillama_url: DEFAULT_DEFILLAMA_URL.to_string(),
            stablecoins_url: DEFAULT_STABLECOINS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

/// Partial configuration, as read from a config file or the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClientConfigOverrides {
    pub coingecko_url: Option<String>,
    pub defillama_url: Option<String>,
    pub stablecoins_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Resolve defaults plus the config file layer.
    ///
    /// An explicit path must exist and parse. A discovered file that fails to
    /// read or parse is logged and skipped.
    pub fn load(explicit: Option<&Path>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = explicit {
            let overrides = ClientConfigOverrides::from_path(path)?;
            tracing::debug!(?path, "Loaded client config");
            config.apply(overrides);
            return Ok(config);
        }

        if let Some(path) = find_config_file() {
            match ClientConfigOverrides::from_path(&path) {
                Ok(overrides) => {
                    tracing::debug!(?path, "Loaded client config");
                    config.apply(overrides);
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to load client config, using defaults");
                }
            }
        }

        Ok(config)
    }

    /// Overlay every value present in `overrides`.
    pub fn apply(&mut self, overrides: ClientConfigOverrides) {
        if let Some(url) = overrides.coingecko_url {
            self.coingecko_url = url;
        }
        if let Some(url) = overrides.defillama_url {
            self.defillama_url = url;
        }
        if let Some(url) = overrides.stablecoins_url {
            self.stablecoins_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(agent) = overrides.user_agent {
            self.user_agent = agent;
        }
    }

    /// Check that every origin is an absolute http(s) URL and the timeout is usable.
    pub fn validate(&self) -> ClientResult<()> {
        for origin in [&self.coingecko_url, &self.defillama_url, &self.stablecoins_url] {
            parse_origin(origin)?;
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::config_error(
                "timeout-secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl ClientConfigOverrides {
    /// Read overrides from a TOML file.
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Parse a configured origin, rejecting anything that cannot carry path segments.
pub(crate) fn parse_origin(origin: &str) -> ClientResult<Url> {
    let url = Url::parse(origin).map_err(|e| ClientError::invalid_url(origin, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::invalid_url(
            origin,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::invalid_url(origin, "cannot be a base"));
    }
    Ok(url)
}

/// Search for config file in precedence order.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    if let Some(home) = home_dir() {
        let global = home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME);
        if global.is_file() {
            return Some(global);
        }
    }

    None
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
