use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use timetable_core::cache::ZstdCodec;
use timetable_core::mutation::RollbackPolicy;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_CACHE_DIR: &str = ".timetable-cache";
const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Which key/value medium backs the caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheBackend {
    #[default]
    Memory,
    File,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "file" => Ok(CacheBackend::File),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the timetable API (default: "http://localhost:3000")
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Cache medium (default: memory)
    pub cache_backend: CacheBackend,
    /// Directory for the file medium (default: ".timetable-cache")
    pub cache_dir: PathBuf,
    /// Maximum blobs held by the memory medium (default: 1,000)
    pub cache_max_entries: NonZeroUsize,
    /// zstd level for cached blobs (default: 3)
    pub compression_level: i32,
    /// Prefix for every cache key
    pub cache_namespace: Option<String>,
    /// What a failed mutation may overwrite (default: guarded)
    pub rollback_policy: RollbackPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TIMETABLE_URL` - API base URL
    /// - `TIMETABLE_TOKEN` - bearer token
    /// - `CACHE_BACKEND` - `memory` or `file`
    /// - `CACHE_DIR` - directory for the file backend
    /// - `CACHE_MAX_ENTRIES` - memory backend capacity
    /// - `CACHE_COMPRESSION_LEVEL` - zstd level
    /// - `CACHE_NAMESPACE` - cache key prefix
    /// - `ROLLBACK_POLICY` - `guarded` or `unguarded`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            base_url: var("TIMETABLE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: var("TIMETABLE_TOKEN"),
            cache_backend: parse(&var, "CACHE_BACKEND")?.unwrap_or_default(),
            cache_dir: var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            cache_max_entries: parse(&var, "CACHE_MAX_ENTRIES")?
                .unwrap_or(default_max_entries()),
            compression_level: parse(&var, "CACHE_COMPRESSION_LEVEL")?
                .unwrap_or(ZstdCodec::DEFAULT_LEVEL),
            cache_namespace: var("CACHE_NAMESPACE"),
            rollback_policy: parse(&var, "ROLLBACK_POLICY")?.unwrap_or_default(),
        })
    }
}

fn default_max_entries() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_CACHE_MAX_ENTRIES).unwrap_or(NonZeroUsize::MIN)
}

fn parse<T, F>(var: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var: name, value })
        })
        .transpose()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            cache_backend: CacheBackend::default(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_max_entries: default_max_entries(),
            compression_level: ZstdCodec::DEFAULT_LEVEL,
            cache_namespace: None,
            rollback_policy: RollbackPolicy::default(),
        }
    }
}
