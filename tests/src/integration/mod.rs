//! Cross-subsystem integration: orchestrator flows over the real adapters
//! and full-stack HTTP round-trips.

pub mod gateway_http;
pub mod verification_flows;
