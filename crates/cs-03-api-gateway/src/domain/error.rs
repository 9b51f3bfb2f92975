//! Gateway-level errors (startup and serving, not wire responses).

use crate::domain::config::ConfigError;

/// Errors raised while bringing up or running the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Serving error after startup
    #[error("server error: {0}")]
    Serve(String),
}
