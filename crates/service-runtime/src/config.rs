//! # Service Configuration
//!
//! Unified configuration for the verification runtime, resolved once at
//! startup from defaults plus `CHIPSEAL_*` environment overrides and then
//! injected into the subsystems. Nothing re-reads the environment per
//! request.
//!
//! ## Security Requirements
//!
//! - The development signature bypass MUST NOT be active in production;
//!   `validate_for_production` refuses to start in that case.

use cs_01_chip_verify::SignatureVerifier;
use cs_03_api_gateway::GatewayConfig;
use std::path::PathBuf;
use tracing::{info, warn};

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP gateway configuration.
    pub gateway: GatewayConfig,
    /// Signature verifier variant (production, or development bypass).
    pub verifier: SignatureVerifier,
    /// Optional JSON registry seed loaded at startup.
    pub seed_path: Option<PathBuf>,
    /// Optional JSONL file for the durable scan log.
    pub scan_log_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            verifier: SignatureVerifier::Production,
            seed_path: None,
            scan_log_path: None,
        }
    }
}

impl ServiceConfig {
    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the development signature bypass is active
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if matches!(self.verifier, SignatureVerifier::Development { .. }) {
            return Err(ConfigError::DevVerifierInProduction);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The development signature bypass is active in a production deploy.
    #[error(
        "SECURITY VIOLATION: development signature bypass is enabled. \
         Unset CHIPSEAL_DEV_BYPASS before deploying with real chips."
    )]
    DevVerifierInProduction,
}

/// Build configuration from defaults plus environment overrides.
pub fn load_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();

    if let Ok(host) = std::env::var("CHIPSEAL_HTTP_HOST") {
        match host.parse() {
            Ok(h) => config.gateway.host = h,
            Err(_) => warn!("CHIPSEAL_HTTP_HOST is not a valid IP address"),
        }
    }
    if let Ok(port) = std::env::var("CHIPSEAL_HTTP_PORT") {
        match port.parse() {
            Ok(p) => config.gateway.port = p,
            Err(_) => warn!("CHIPSEAL_HTTP_PORT is not a valid port"),
        }
    }

    // Comma-separated allow-list; defaults to `*`
    if let Ok(origins) = std::env::var("CHIPSEAL_CORS_ORIGINS") {
        config.gateway.cors.allowed_origins = origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
    }

    if let Ok(path) = std::env::var("CHIPSEAL_SEED_FILE") {
        config.seed_path = Some(PathBuf::from(path));
    }
    if let Ok(path) = std::env::var("CHIPSEAL_SCAN_LOG_FILE") {
        config.scan_log_path = Some(PathBuf::from(path));
    }

    // Explicit opt-in for unit/dev chips without secrets. Never set this
    // where real chips are in circulation.
    if let Ok(bypass) = std::env::var("CHIPSEAL_DEV_BYPASS") {
        warn!("development signature bypass is ACTIVE; secretless chips will verify");
        config.verifier = SignatureVerifier::Development {
            bypass_code: bypass,
        };
    } else {
        info!("signature verifier in production mode");
    }

    config
}
