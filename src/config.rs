//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; every section has production
//! defaults so the binary runs without a file at all.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};
use crate::fetch::proxy::ProxyRoute;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Upstream FPL API base, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Ordered proxy routes; each gets the full retry budget before the
    /// next is tried.
    #[serde(default = "default_proxies")]
    pub proxies: Vec<ProxyRoute>,
}

fn default_api_url() -> String {
    "https://fantasy.premierleague.com/api".into()
}

fn default_proxies() -> Vec<ProxyRoute> {
    vec![ProxyRoute::Direct]
}

/// Retry, backoff and inter-request pacing knobs.
///
/// The delays are serialization points that keep the pipeline under the
/// upstream's informal rate limits; lowering them invites 429s.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Linear backoff base: attempt n sleeps `base_delay_ms * n`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Pause between the standings request and the first team request.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Pause before every per-team history request.
    #[serde(default = "default_team_delay_ms")]
    pub team_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    2000
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_team_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Cache directory; defaults to the platform cache dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

const fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.network.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if self.network.proxies.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "proxies",
                reason: "at least one route is required (use mode = \"direct\")".into(),
            }
            .into());
        }
        for route in &self.network.proxies {
            let (ProxyRoute::Prefix { url } | ProxyRoute::Query { url, .. }) = route else {
                continue;
            };
            if let Err(e) = url::Url::parse(url) {
                return Err(ConfigError::InvalidValue {
                    field: "proxies",
                    reason: format!("{url}: {e}"),
                }
                .into());
            }
        }
        if self.fetch.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            fetch: FetchConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            proxies: default_proxies(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            team_delay_ms: default_team_delay_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            ttl_secs: default_ttl_secs(),
            dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
