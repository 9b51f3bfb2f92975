//! # Chip Verification Subsystem (CS-01)
//!
//! Challenge/response authenticity verification for physical chips embedded
//! in artworks. A scanner presents a tag identifier, a monotonic counter,
//! and an HMAC signature; this subsystem classifies the attempt as
//! `authentic`, `mismatch`, `cloned`, or `invalid` and appends one audit
//! event per attempt.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure verification logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Service Layer** (`service.rs`): The orchestrator state machine wiring
//!   domain logic to the chip directory and the scan-event sink
//!
//! ## Security Notes
//!
//! - **Constant-Time Comparison**: Presented signatures are compared with
//!   `subtle::ConstantTimeEq`; a mismatch position never shapes timing.
//! - **Fail Closed**: Malformed hex in a presented signature is a
//!   non-match, never an error surfaced to the scanner.
//! - **Linearizable Counter Advance**: Acceptance-and-advance is a single
//!   compare-and-swap against the expected prior value; two concurrent
//!   scans of one chip can never both be accepted.

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::entities::{ScanContext, ScanRequest, ScanVerdict};
pub use domain::errors::VerifyError;
pub use domain::link::{resolve_link, LinkResolution};
pub use domain::replay::{check_counter, parse_counter, ReplayDecision};
pub use domain::signature::{compute_signature, SignatureVerifier};
pub use ports::inbound::ChipVerificationApi;
pub use ports::outbound::{
    AuditError, ChipDirectory, CounterUpdate, DirectoryError, ScanEventSink,
};
pub use service::ChipVerificationService;
