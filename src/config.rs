//! Resolver configuration
//!
//! Loaded from YAML (`config/gurbani_search.yaml`) with every field
//! defaulted, then overlaid from the environment:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `GURBANI_SEARCH_CONFIG` | Path of the YAML file |
//! | `BANIDB_BASE_URL` | Overrides `provider.base_url` |
//! | `GURBANI_SEARCH_ADDR` | Overrides `server.addr` |

use std::path::Path;
use std::time::Duration;

use banidb_client::HttpProviderConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "config/gurbani_search.yaml";

const DEFAULT_CATALOG_TTL_HOURS: i64 = 24;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub provider: ProviderConfig,
    pub cascade: CascadeConfig,
    pub catalog: CatalogConfig,
    pub scoring: ScoringConfig,
    pub continuation: ContinuationConfig,
    pub server: ServerConfig,
}

/// External verse provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Corpus scope passed with every search
    pub source: String,
    pub result_limit: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: banidb_client::http::DEFAULT_BASE_URL.to_string(),
            user_agent: banidb_client::http::DEFAULT_USER_AGENT.to_string(),
            timeout_secs: banidb_client::http::DEFAULT_TIMEOUT_SECS,
            source: banidb_client::DEFAULT_SOURCE.to_string(),
            result_limit: banidb_client::DEFAULT_RESULT_LIMIT,
        }
    }
}

impl ProviderConfig {
    pub fn http(&self) -> HttpProviderConfig {
        HttpProviderConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Strategy cascade pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Delay before every search call
    pub pacing_delay_ms: u64,
    /// Bound on each search call
    pub call_timeout_secs: u64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: 300,
            call_timeout_secs: 5,
        }
    }
}

impl CascadeConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Composition catalog cache and fuzzy name matching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub ttl_hours: i64,
    pub fetch_timeout_secs: u64,
    /// Minimum similarity (0.0-1.0) for a fuzzy catalog name match
    pub fuzzy_threshold: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_CATALOG_TTL_HOURS,
            fetch_timeout_secs: 5,
            fuzzy_threshold: 0.6,
        }
    }
}

impl CatalogConfig {
    /// Catalog time-to-live; a value `validate` rejects falls back to the default
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.ttl_hours)
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_CATALOG_TTL_HOURS))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Adaptive confidence threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Normalized queries longer than this use `long_query_threshold`
    pub long_query_chars: usize,
    pub long_query_threshold: u8,
    pub short_query_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            long_query_chars: 15,
            long_query_threshold: 45,
            short_query_threshold: 55,
        }
    }
}

/// Same-composition continuation matching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuationConfig {
    /// Lines considered from the current one onward
    pub window: usize,
    pub accept_score: f64,
    /// Softer acceptance when at least one word matched
    pub soft_accept_score: f64,
}

impl Default for ContinuationConfig {
    fn default() -> Self {
        Self {
            window: 15,
            accept_score: 60.0,
            soft_accept_score: 40.0,
        }
    }
}

/// HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl ResolverConfig {
    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Load the file named by `GURBANI_SEARCH_CONFIG` (or the default path
    /// when it exists), then apply environment overrides and validate
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("GURBANI_SEARCH_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BANIDB_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(addr) = lookup("GURBANI_SEARCH_ADDR") {
            self.server.addr = addr;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.provider.base_url).map_err(|e| ConfigError::Invalid {
            field: "provider.base_url",
            reason: e.to_string(),
        })?;
        if !(0.0..=1.0).contains(&self.catalog.fuzzy_threshold) {
            return Err(ConfigError::Invalid {
                field: "catalog.fuzzy_threshold",
                reason: format!("{} is outside 0.0..=1.0", self.catalog.fuzzy_threshold),
            });
        }
        if self.catalog.ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                field: "catalog.ttl_hours",
                reason: "must be positive".to_string(),
            });
        }
        if chrono::Duration::try_hours(self.catalog.ttl_hours).is_none() {
            return Err(ConfigError::Invalid {
                field: "catalog.ttl_hours",
                reason: format!("{} hours is out of range", self.catalog.ttl_hours),
            });
        }
        if self.continuation.window == 0 {
            return Err(ConfigError::Invalid {
                field: "continuation.window",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
