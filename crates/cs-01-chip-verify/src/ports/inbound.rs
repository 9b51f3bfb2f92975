//! # Inbound Port (Driving Port / API)
//!
//! The verification contract offered to transports (the HTTP gateway, test
//! harnesses).

use crate::domain::entities::{ScanContext, ScanRequest, ScanVerdict};
use crate::domain::errors::VerifyError;
use shared_types::ScanEvent;

/// Chip verification API.
///
/// Each call is evaluated independently; the only persisted per-request
/// state is the immutable scan event the orchestrator appends.
#[async_trait::async_trait]
pub trait ChipVerificationApi: Send + Sync {
    /// Run one scan through the authenticity state machine.
    ///
    /// Authenticity failures (`invalid`, `cloned`, `mismatch`) are verdict
    /// values, not errors.
    ///
    /// # Errors
    /// * `VerifyError::MissingParams` - tag, signature, or counter absent
    /// * `VerifyError::BadCounter` - counter is not a non-negative integer
    /// * `VerifyError::Directory` / `VerifyError::Audit` /
    ///   `VerifyError::Timeout` - collaborator failures
    async fn verify_scan(
        &self,
        request: ScanRequest,
        ctx: ScanContext,
    ) -> Result<ScanVerdict, VerifyError>;

    /// Recent scan events for the chip behind `tag_id`, newest first.
    ///
    /// An unknown tag yields an empty list rather than an error; the audit
    /// trail is never exposed for unresolvable tags.
    async fn scan_history(
        &self,
        tag_id: &str,
        limit: usize,
    ) -> Result<Vec<ScanEvent>, VerifyError>;
}
