//! # ChipSeal Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Shared fixtures (seeded registry stacks)
//! └── integration/      # Cross-subsystem flows
//!     ├── verification_flows.rs   # State machine paths and worked examples
//!     ├── replay_concurrency.rs   # Counter races and linearizability
//!     └── gateway_http.rs         # Full-stack HTTP round-trips
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cs-tests
//!
//! # By category
//! cargo test -p cs-tests integration::verification_flows
//! cargo test -p cs-tests integration::replay_concurrency
//! cargo test -p cs-tests integration::gateway_http
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod support;
