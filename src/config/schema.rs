//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP transport settings.
    pub server: ServerConfig,

    /// Dispatcher tuning (chain cache, context pool).
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum buffered request body in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Memoize resolved (method, path) chains.
    pub cache_chains: bool,

    /// Upper bound on memoized methods per route.
    pub max_cached_methods: usize,

    /// Idle contexts kept for reuse; extras are dropped on release.
    pub pool_max_idle: usize,

    /// Contexts constructed when the dispatcher is built.
    pub pool_prewarm: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cache_chains: true,
            max_cached_methods: 16,
            pool_max_idle: 1024,
            pool_prewarm: 0,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (trace, debug, info, warn, error, or a full `EnvFilter` directive).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
