//! # Link Resolver
//!
//! Classifies agreement between the chip's bound artwork and the artwork
//! context asserted by the caller. Reached only after signature and
//! counter checks have passed, so every outcome here is an accepted scan:
//! `authentic` when nothing contradicts the link, `mismatch` when the
//! caller is looking at a different artwork than the chip is bound to.

use shared_types::{ArtworkId, ScanState};

/// Agreement between the caller-asserted artwork and the chip's link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResolution {
    /// `authentic` or `mismatch`.
    pub state: ScanState,
    /// The chip's bound artwork, `None` when the chip is not yet linked
    /// (registration in progress, not a failure).
    pub linked_artwork_id: Option<ArtworkId>,
}

/// Apply the agreement truth table.
#[must_use]
pub fn resolve_link(
    linked: Option<&ArtworkId>,
    asserted: Option<&ArtworkId>,
) -> LinkResolution {
    let state = match (linked, asserted) {
        // Values differ: possibly a misattached or swapped physical tag.
        (Some(linked), Some(asserted)) if linked != asserted => ScanState::Mismatch,
        // Agreement, a missing assertion, or an unlinked chip: nothing to
        // contradict.
        _ => ScanState::Authentic,
    };

    LinkResolution {
        state,
        linked_artwork_id: linked.cloned(),
    }
}
