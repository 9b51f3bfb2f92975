//! # API Gateway (CS-03) - HTTP front door for chip verification
//!
//! Mounts the verification orchestrator behind a small HTTP surface:
//!
//! ```text
//! GET/POST /api/chip/verify    challenge/response verification
//! GET      /api/chip/history   recent scan events for a tag
//! GET      /health             liveness probe
//! ```
//!
//! # Wire Contract
//!
//! The verify endpoint accepts `a` (tag), `c` (hex signature), `ctr`
//! (counter string), optional `t` (key id, pass-through) and
//! `page_artwork_id`, as query parameters on GET or a JSON body on POST.
//!
//! Responses:
//! - 200 `{"ok":true,"state":"authentic"|"mismatch","linked_artwork_id":…,"owner_handle":…}`
//! - 200 `{"ok":false,"state":"invalid"|"cloned"}`
//! - 400 `{"ok":false,"error":"missing_params"|"bad_counter"}`
//! - 500 `{"ok":false,"error":"server_error"}`
//!
//! Authenticity failures ride on HTTP 200: the request succeeded, the chip
//! did not. CORS preflight is answered by the CORS layer with no body.

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;

// Re-exports for public API
pub use domain::config::{CorsConfig, GatewayConfig, LimitsConfig, TimeoutConfig};
pub use domain::error::GatewayError;
pub use domain::types::*;
pub use service::ApiGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
