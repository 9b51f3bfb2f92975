//! # Chip Registry Subsystem (CS-02)
//!
//! Adapters implementing the verification core's outbound ports: the chip
//! directory and the append-only scan-event sink.
//!
//! In production the marketplace's relational store stands behind these
//! ports; this crate provides the reference adapters the service runtime
//! and the test suite run against:
//!
//! - [`InMemoryChipDirectory`]: chip/link/owner tables with a linearizable
//!   per-chip counter update (exclusive row access for the duration of the
//!   compare-and-swap)
//! - [`InMemoryScanLog`]: append-only event log with newest-first queries
//! - [`JsonlScanLog`]: the in-memory log plus a line-delimited JSON file
//!   flushed per event for durable scan history
//! - [`RegistrySeed`]: JSON seed document loaded at startup (chips are
//!   provisioned outside this core and arrive pre-populated)

pub mod jsonl;
pub mod memory;
pub mod seed;

pub use jsonl::JsonlScanLog;
pub use memory::{InMemoryChipDirectory, InMemoryScanLog};
pub use seed::{RegistrySeed, SeedError};
