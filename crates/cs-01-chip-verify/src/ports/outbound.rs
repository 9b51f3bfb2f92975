//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define the collaborators this subsystem needs: the chip
//! directory (the marketplace's relational store, reached through narrow
//! point lookups) and the append-only scan-event sink.

use shared_types::{ArtworkId, Chip, ChipArtworkLink, ChipId, NewScanEvent, ScanEvent, TagId};
use thiserror::Error;

/// Error from chip directory operations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The backing store could not be reached.
    #[error("chip directory unavailable: {0}")]
    Unavailable(String),

    /// A lookup or update failed inside the store.
    #[error("chip directory query failed: {0}")]
    Query(String),
}

/// Error from scan-event sink operations.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    /// The sink could not be reached.
    #[error("scan log unavailable: {0}")]
    Unavailable(String),

    /// The append itself failed.
    #[error("scan log append failed: {0}")]
    Append(String),
}

/// Result of the atomic conditional counter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    /// The stored counter matched the expected prior value and was
    /// advanced.
    Advanced,
    /// The stored counter no longer matched: a concurrent acceptance
    /// landed first.
    Conflict {
        /// The counter value observed at update time.
        current: u64,
    },
}

/// Gateway to the chip registry.
///
/// All reads are independent point lookups. `advance_counter` is the one
/// mandatory concurrency control point in the system: it MUST be a single
/// atomic conditional update (compare-and-swap against the expected prior
/// value, or a row lock held for the check-and-write), never a separate
/// read and write.
#[async_trait::async_trait]
pub trait ChipDirectory: Send + Sync {
    /// Look up a chip by its externally presented tag identifier.
    async fn chip_by_tag(&self, tag_id: &TagId) -> Result<Option<Chip>, DirectoryError>;

    /// The chip's active artwork link, if it has been bound.
    async fn link_for_chip(
        &self,
        chip_id: ChipId,
    ) -> Result<Option<ChipArtworkLink>, DirectoryError>;

    /// Current owner handle of an artwork. Display-only enrichment.
    async fn owner_handle(
        &self,
        artwork_id: &ArtworkId,
    ) -> Result<Option<String>, DirectoryError>;

    /// Atomically advance the chip's counter from `expected_prior` to
    /// `new_value`.
    ///
    /// Returns [`CounterUpdate::Conflict`] when the stored value no longer
    /// equals `expected_prior`; the counter MUST NOT change in that case.
    async fn advance_counter(
        &self,
        chip_id: ChipId,
        expected_prior: u64,
        new_value: u64,
    ) -> Result<CounterUpdate, DirectoryError>;
}

/// Append-only sink for the scan audit trail.
#[async_trait::async_trait]
pub trait ScanEventSink: Send + Sync {
    /// Append one scan event, assigning its id and timestamp.
    async fn record_scan(&self, event: NewScanEvent) -> Result<ScanEvent, AuditError>;

    /// Recent events for a chip, newest first, at most `limit`.
    async fn recent_scans(
        &self,
        chip_id: ChipId,
        limit: usize,
    ) -> Result<Vec<ScanEvent>, AuditError>;
}
