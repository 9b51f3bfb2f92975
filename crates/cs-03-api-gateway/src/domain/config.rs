//! Gateway configuration with validation.
//!
//! Resolved once at startup and injected into the service; never re-read
//! per request.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8090)
    pub port: u16,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8090,
            cors: CorsConfig::default(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.request.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }
        if self.timeouts.collaborator.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "collaborator timeout cannot be 0".into(),
            ));
        }
        if self.timeouts.collaborator > self.timeouts.request {
            return Err(ConfigError::InvalidTimeout(
                "collaborator timeout cannot exceed the request timeout".into(),
            ));
        }
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }
        if self.limits.history_limit == 0 {
            return Err(ConfigError::InvalidLimit(
                "history_limit cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request deadline enforced by the middleware stack
    #[serde(with = "humantime_serde")]
    pub request: Duration,
    /// Deadline applied to each data-store and audit-log call
    #[serde(with = "humantime_serde")]
    pub collaborator: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
            collaborator: Duration::from_secs(3),
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 64KB; verify bodies are tiny)
    pub max_request_size: usize,
    /// Max events returned by the history endpoint
    pub history_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 64 * 1024,
            history_limit: 50,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS handling
    pub enabled: bool,
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers; `*` allows any
    pub allowed_headers: Vec<String>,
    /// Preflight cache max age in seconds
    pub max_age: u64,
    /// Allow credentials
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["*".to_string()],
            max_age: 3600,
            allow_credentials: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A timeout value is out of range
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    /// A limit value is out of range
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}
