//! # Core Domain Entities
//!
//! Defines the entities of the chip verification domain.
//!
//! ## Clusters
//!
//! - **Identity**: `ChipId`, `TagId`, `ArtworkId`, `ChipSecret`
//! - **Registry**: `Chip`, `ChipArtworkLink`
//! - **Audit**: `ScanState`, `ScanEvent`, `NewScanEvent`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Opaque internal identifier for a registered chip.
///
/// Assigned once at registration and immutable thereafter. Never shown to
/// scanner clients; the externally visible handle is the [`TagId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChipId(pub Uuid);

impl ChipId {
    /// Generate a fresh random chip identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Externally presented identifier read from the physical chip's NFC/RFID
/// payload. Unique across the registry and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    /// View the raw tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Marketplace identifier of an artwork a chip may be affixed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkId(pub String);

impl ArtworkId {
    /// View the raw artwork id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtworkId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Pre-shared symmetric key used to validate chip signatures.
///
/// Present only for HMAC-class chips. Owned exclusively by the registry and
/// never returned to callers; `Debug` output is redacted so the key cannot
/// leak through logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChipSecret(Vec<u8>);

impl ChipSecret {
    /// Wrap raw key material.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Key bytes for the MAC computation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ChipSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChipSecret(<redacted>)")
    }
}

// =============================================================================
// CLUSTER B: REGISTRY
// =============================================================================

/// Identity and trust anchor for a physical tag.
///
/// Created during chip provisioning (outside this core). The `counter`
/// field is mutated solely through the registry's atomic conditional
/// update on an accepted verification. Chips are deactivated rather than
/// deleted so the audit trail stays intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chip {
    /// Opaque internal identifier, assigned at registration.
    pub id: ChipId,
    /// Externally presented tag identifier; unique; immutable.
    pub tag_id: TagId,
    /// Pre-shared HMAC key; `None` for unit/dev chips.
    pub secret: Option<ChipSecret>,
    /// Optional key identifier for future asymmetric schemes; recorded,
    /// never interpreted.
    pub key_id: Option<String>,
    /// Last-accepted monotonic counter value; starts at 0.
    pub counter: u64,
    /// Deactivated chips fail verification but keep their history.
    pub active: bool,
}

/// Binds a chip to the artwork it authenticates.
///
/// Created when a chip is physically affixed to an artwork (outside this
/// core); at most one active link per chip; read-only from this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipArtworkLink {
    /// The bound chip.
    pub chip_id: ChipId,
    /// The artwork the chip authenticates.
    pub artwork_id: ArtworkId,
}

// =============================================================================
// CLUSTER C: AUDIT
// =============================================================================

/// Terminal classification of one verification attempt.
///
/// Exactly one state is selected per request; there is no persisted
/// per-request state beyond the immutable [`ScanEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    /// Unknown tag, deactivated chip, or failed signature.
    Invalid,
    /// Replay or counter-rollback signal: the presented counter was not
    /// newer than the last accepted one.
    Cloned,
    /// Authentic, unreplayed chip bound to a different artwork than the
    /// one the caller asserted.
    Mismatch,
    /// Signature, counter, and link checks all agree.
    Authentic,
}

impl ScanState {
    /// True for the states reached only after signature and counter checks
    /// both passed (`authentic` and `mismatch`).
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, ScanState::Authentic | ScanState::Mismatch)
    }

    /// Lowercase wire name, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScanState::Invalid => "invalid",
            ScanState::Cloned => "cloned",
            ScanState::Mismatch => "mismatch",
            ScanState::Authentic => "authentic",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record of one verification attempt.
///
/// Append-only; never updated or deleted by this core. `chip_id` is `None`
/// when the presented tag did not resolve to any known chip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// Resolved chip, when the tag was known.
    pub chip_id: Option<ChipId>,
    /// Best available artwork context: caller-asserted, falling back to
    /// the chip's linked artwork.
    pub artwork_id: Option<ArtworkId>,
    /// Classified outcome of the attempt.
    pub state: ScanState,
    /// Client address, when the transport supplied one.
    pub ip: Option<IpAddr>,
    /// Client user agent, when supplied.
    pub user_agent: Option<String>,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields of a scan event prior to persistence.
///
/// The sink assigns `id` and `created_at` when it appends the record.
#[derive(Debug, Clone)]
pub struct NewScanEvent {
    /// Resolved chip, when the tag was known.
    pub chip_id: Option<ChipId>,
    /// Best available artwork context.
    pub artwork_id: Option<ArtworkId>,
    /// Classified outcome of the attempt.
    pub state: ScanState,
    /// Client address, when the transport supplied one.
    pub ip: Option<IpAddr>,
    /// Client user agent, when supplied.
    pub user_agent: Option<String>,
}
