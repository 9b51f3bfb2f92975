//! # Verification Errors
//!
//! The error taxonomy of the orchestrator. Authenticity failures are NOT
//! errors; they are first-class [`shared_types::ScanState`] outcomes.
//! Errors cover client input problems and infrastructure failures only.

use crate::ports::outbound::{AuditError, DirectoryError};
use thiserror::Error;

/// Errors surfaced by a verification attempt.
#[derive(Debug, Clone, Error)]
pub enum VerifyError {
    /// Tag identifier, signature, or counter is absent. Rejected before
    /// any state is assigned; mapped to HTTP 400.
    #[error("missing required scan parameters")]
    MissingParams,

    /// The presented counter is not a non-negative integer. A client
    /// error distinct from the replay/clone signal; mapped to HTTP 400.
    #[error("counter is not a non-negative integer")]
    BadCounter,

    /// Chip directory lookup or update failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Scan-event append failed. Surfaced even after a classification was
    /// computed: an unaudited verdict is a compliance gap.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// A collaborator call exceeded its deadline.
    #[error("collaborator call timed out: {0}")]
    Timeout(&'static str),
}

impl VerifyError {
    /// True for errors caused by the client's input rather than by the
    /// service or its collaborators.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, VerifyError::MissingParams | VerifyError::BadCounter)
    }
}
