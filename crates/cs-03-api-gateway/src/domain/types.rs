//! Wire types for the verification endpoints.
//!
//! Request fields keep the short names chip firmware embeds in scan URLs
//! (`a`, `c`, `ctr`, `t`). Responses use the ok/state/error contract; the
//! serde derives are the single source of truth for field names.

use chrono::{DateTime, Utc};
use cs_01_chip_verify::ScanRequest;
use serde::{Deserialize, Serialize};
use shared_types::{ScanEvent, ScanState};

/// Verification request: query parameters on GET, JSON body on POST.
///
/// Every field is optional at the schema layer; the orchestrator's first
/// state-machine rule decides what "missing" means, so a partial request
/// still reaches the audit trail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyParams {
    /// Tag identifier read from the chip.
    pub a: Option<String>,
    /// Hex-encoded signature.
    pub c: Option<String>,
    /// Counter as presented by the chip.
    pub ctr: Option<String>,
    /// Optional key identifier; pass-through.
    pub t: Option<String>,
    /// Artwork the caller believes the chip is attached to.
    pub page_artwork_id: Option<String>,
}

impl From<VerifyParams> for ScanRequest {
    fn from(params: VerifyParams) -> Self {
        ScanRequest {
            tag_id: params.a,
            signature: params.c,
            counter: params.ctr,
            key_id: params.t,
            page_artwork_id: params.page_artwork_id,
        }
    }
}

/// History request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    /// Tag identifier to look up.
    pub a: Option<String>,
    /// Max events to return (clamped by the configured limit).
    pub limit: Option<usize>,
}

/// Body for accepted scans (`authentic` / `mismatch`).
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedBody {
    /// Always `true`.
    pub ok: bool,
    /// `authentic` or `mismatch`.
    pub state: ScanState,
    /// The chip's bound artwork, or `null` when unlinked.
    pub linked_artwork_id: Option<String>,
    /// Current owner handle of the linked artwork, display-only.
    pub owner_handle: Option<String>,
}

/// Body for handled authenticity failures (`invalid` / `cloned`).
#[derive(Debug, Clone, Serialize)]
pub struct RejectedBody {
    /// Always `false`.
    pub ok: bool,
    /// `invalid` or `cloned`.
    pub state: ScanState,
}

/// Body for client and server errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub ok: bool,
    /// `missing_params`, `bad_counter`, or `server_error`.
    pub error: &'static str,
}

/// One entry of the history endpoint.
///
/// Transport metadata (ip, user agent) stays in the audit store; it is
/// not exposed over the public surface.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// Classified outcome.
    pub state: ScanState,
    /// Artwork context recorded with the event.
    pub artwork_id: Option<String>,
    /// When the scan happened.
    pub created_at: DateTime<Utc>,
}

impl From<ScanEvent> for HistoryEntry {
    fn from(event: ScanEvent) -> Self {
        Self {
            state: event.state,
            artwork_id: event.artwork_id.map(|id| id.0),
            created_at: event.created_at,
        }
    }
}

/// Body of the history endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryBody {
    /// Always `true` on success.
    pub ok: bool,
    /// Recent events, newest first.
    pub events: Vec<HistoryEntry>,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthBody {
    /// Always `"ok"` while the process serves.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}
