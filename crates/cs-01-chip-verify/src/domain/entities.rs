//! # Verification Entities
//!
//! Types crossing the inbound port: the raw scan request, its transport
//! context, and the classified verdict.

use shared_types::{ArtworkId, ScanState};
use std::net::IpAddr;

/// Raw fields presented by a scanner client.
///
/// All fields are optional at this layer; presence of the required trio
/// (tag, signature, counter) is the first rule of the state machine, so the
/// orchestrator, not the transport, decides what "missing" means. Empty
/// strings count as missing.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Tag identifier read from the chip (`a`).
    pub tag_id: Option<String>,
    /// Hex-encoded signature (`c`).
    pub signature: Option<String>,
    /// Counter as the raw presented string (`ctr`). The HMAC covers this
    /// string, so it is parsed only after signature verification.
    pub counter: Option<String>,
    /// Optional key identifier (`t`); pass-through, currently unused.
    pub key_id: Option<String>,
    /// Artwork the caller believes the chip is attached to.
    pub page_artwork_id: Option<String>,
}

impl ScanRequest {
    fn non_empty(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|s| !s.is_empty())
    }

    /// The required trio, or `None` if any of tag, signature, or counter
    /// is absent or empty.
    #[must_use]
    pub fn required_fields(&self) -> Option<(&str, &str, &str)> {
        Some((
            Self::non_empty(&self.tag_id)?,
            Self::non_empty(&self.signature)?,
            Self::non_empty(&self.counter)?,
        ))
    }

    /// Caller-asserted artwork context, if any.
    #[must_use]
    pub fn asserted_artwork(&self) -> Option<ArtworkId> {
        Self::non_empty(&self.page_artwork_id)
            .map(str::to_owned)
            .map(ArtworkId)
    }
}

/// Transport metadata recorded into the audit trail.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    /// Client address, when the transport supplied one.
    pub ip: Option<IpAddr>,
    /// Client user agent, when supplied.
    pub user_agent: Option<String>,
}

/// Outcome of a classified verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    /// Signature and counter checks passed; link agreement selected the
    /// state (`authentic` or `mismatch`) and the counter was advanced.
    Accepted {
        /// `authentic` or `mismatch`.
        state: ScanState,
        /// The chip's bound artwork, `None` when the chip is not yet linked.
        linked_artwork_id: Option<ArtworkId>,
        /// Current owner handle of the linked artwork; display-only
        /// enrichment, `None` when unavailable.
        owner_handle: Option<String>,
    },
    /// The chip failed authenticity checks (`invalid` or `cloned`).
    Rejected {
        /// `invalid` or `cloned`.
        state: ScanState,
    },
}

impl ScanVerdict {
    /// The classified state carried by this verdict.
    #[must_use]
    pub fn state(&self) -> ScanState {
        match self {
            ScanVerdict::Accepted { state, .. } | ScanVerdict::Rejected { state } => *state,
        }
    }
}
