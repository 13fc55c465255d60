//! Configuration Module
//!
//! Handles loading and managing relay configuration from environment variables.

use std::env;
use std::str::FromStr;

use serde::Serialize;

// == Cache Config ==
/// Static limits for the chunk cache, fixed at process start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheConfig {
    /// Maximum age of a batch in seconds before it is swept
    pub ttl_secs: u64,
    /// Maximum number of batches held at once
    pub max_batches: usize,
    /// Highest chunk number accepted
    pub max_chunk_number: u64,
    /// Share of currently available system memory the cache may occupy
    pub memory_limit_fraction: f64,
}

impl CacheConfig {
    /// Loads cache limits from environment variables.
    ///
    /// # Environment Variables
    /// - `CHUNK_TTL_SECS` - Batch time-to-live in seconds (default: 600)
    /// - `MAX_BATCHES` - Maximum batch count (default: 100)
    /// - `MAX_CHUNK_NUMBER` - Highest accepted chunk number (default: 10000)
    /// - `MEMORY_LIMIT_FRACTION` - Fraction of available memory (default: 0.5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_secs: env_or("CHUNK_TTL_SECS", defaults.ttl_secs),
            max_batches: env_or("MAX_BATCHES", defaults.max_batches),
            max_chunk_number: env_or("MAX_CHUNK_NUMBER", defaults.max_chunk_number),
            memory_limit_fraction: env_or("MEMORY_LIMIT_FRACTION", defaults.memory_limit_fraction),
        }
        .normalized()
    }

    /// Clamps the memory fraction into `[0, 1]`; NaN falls back to the default.
    pub fn normalized(mut self) -> Self {
        if self.memory_limit_fraction.is_nan() {
            self.memory_limit_fraction = Self::default().memory_limit_fraction;
        }
        self.memory_limit_fraction = self.memory_limit_fraction.clamp(0.0, 1.0);
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            max_batches: 100,
            max_chunk_number: 10_000,
            memory_limit_fraction: 0.5,
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chunk cache limits
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds, 0 disables the task
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8532)
    /// - `SWEEP_INTERVAL` - Background sweep frequency in seconds (default: 30)
    /// - plus everything read by [`CacheConfig::from_env`]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache: CacheConfig::from_env(),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 8532,
            sweep_interval: 30,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
