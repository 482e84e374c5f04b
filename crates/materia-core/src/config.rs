//! Configuration for materia
//!
//! Stored as TOML, by default in `~/.config/materia/config.toml`. Every
//! section and field is optional; missing values fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bail_invalid;
use crate::content::DEFAULT_TIMEOUT_SECONDS;
use crate::error::{MateriaError, Result};
use crate::similarity::{RankOptions, DEFAULT_MIN_SIMILARITY};

const CONFIG_DIR: &str = "materia";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "MATERIA_CONFIG_DIR";
const CONTENT_URL_ENV_VAR: &str = "MATERIA_CONTENT_URL";
const CONTENT_TIMEOUT_ENV_VAR: &str = "MATERIA_CONTENT_TIMEOUT";

/// Default number of results served per lookup
pub const DEFAULT_SERVED_RESULTS: usize = 5;

/// Upper bound for cache lifetimes and the sweep interval (30 days)
pub const MAX_CACHE_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub similarity: SimilarityConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub content: ContentConfig,
}

/// Lookup defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Minimum composite score (0-100)
    #[serde(default = "default_min_similarity")]
    pub min_similarity: u32,

    /// Maximum results per lookup
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Cache lifetimes in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Candidate pool lifetime
    #[serde(default = "default_pool_ttl_secs")]
    pub pool_ttl_secs: u64,

    /// Ranking lifetime
    #[serde(default = "default_ranking_ttl_secs")]
    pub ranking_ttl_secs: u64,

    /// Background sweep interval (0 disables the sweeper)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Where the formula pool comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// JSON file holding the pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Content API endpoint returning the pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request timeout for `url`
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_min_similarity() -> u32 {
    DEFAULT_MIN_SIMILARITY as u32
}

fn default_max_results() -> usize {
    DEFAULT_SERVED_RESULTS
}

fn default_pool_ttl_secs() -> u64 {
    300
}

fn default_ranking_ttl_secs() -> u64 {
    600
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            min_similarity: default_min_similarity(),
            max_results: default_max_results(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pool_ttl_secs: default_pool_ttl_secs(),
            ranking_ttl_secs: default_ranking_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SimilarityConfig {
    pub fn rank_options(&self) -> RankOptions {
        RankOptions::new(self.min_similarity as f64, self.max_results)
    }
}

impl CacheConfig {
    pub fn pool_ttl(&self) -> Duration {
        Duration::from_secs(self.pool_ttl_secs)
    }

    pub fn ranking_ttl(&self) -> Duration {
        Duration::from_secs(self.ranking_ttl_secs)
    }

    /// Sweep interval, `None` when sweeping is disabled
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        // Allow environment variable override for testing
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    MateriaError::Other("unable to determine config directory".to_string())
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MateriaError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| MateriaError::failed_operation("serialize config", e))
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(CONTENT_URL_ENV_VAR).filter(|s| !s.is_empty()) {
            self.content.url = Some(url);
        }

        if let Some(timeout) = lookup(CONTENT_TIMEOUT_ENV_VAR) {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.content.timeout_secs = seconds.clamp(1, 300);
            }
        }
    }

    /// Reject values the similarity service cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.similarity.min_similarity > 100 {
            bail_invalid!(
                "similarity.min_similarity (expected 0-100)",
                self.similarity.min_similarity
            );
        }
        if self.similarity.max_results == 0 {
            bail_invalid!(
                "similarity.max_results (expected at least 1)",
                self.similarity.max_results
            );
        }
        let cache_fields = [
            ("cache.pool_ttl_secs", self.cache.pool_ttl_secs),
            ("cache.ranking_ttl_secs", self.cache.ranking_ttl_secs),
            ("cache.sweep_interval_secs", self.cache.sweep_interval_secs),
        ];
        for (field, secs) in cache_fields {
            if secs > MAX_CACHE_SECS {
                bail_invalid!(&format!("{field} (expected at most {MAX_CACHE_SECS})"), secs);
            }
        }
        if self.content.timeout_secs == 0 {
            bail_invalid!(
                "content.timeout_secs (expected at least 1)",
                self.content.timeout_secs
            );
        }
        Ok(())
    }
}
