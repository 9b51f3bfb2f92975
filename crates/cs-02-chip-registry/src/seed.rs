//! Registry seed document.
//!
//! Chip provisioning happens outside this service; the runtime receives a
//! pre-populated registry as a JSON document and loads it once at startup.
//!
//! ```json
//! {
//!   "chips": [
//!     { "tag_id": "TAG123", "secret": "s3cr3t", "counter": 0 }
//!   ],
//!   "links": [
//!     { "tag_id": "TAG123", "artwork_id": "art-7f3b" }
//!   ],
//!   "owners": [
//!     { "artwork_id": "art-7f3b", "handle": "@collector" }
//!   ]
//! }
//! ```

use crate::memory::InMemoryChipDirectory;
use serde::Deserialize;
use shared_types::{ArtworkId, Chip, ChipArtworkLink, ChipId, ChipSecret, TagId};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading a seed document.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON of the expected shape.
    #[error("failed to parse seed document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A link or owner entry references a tag that is not in `chips`.
    #[error("seed link references unknown tag: {0}")]
    UnknownTag(String),
}

/// One chip entry in the seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedChip {
    /// Externally presented tag identifier.
    pub tag_id: String,
    /// Pre-shared key as a UTF-8 string; absent for unit/dev chips.
    #[serde(default)]
    pub secret: Option<String>,
    /// Optional key identifier; pass-through.
    #[serde(default)]
    pub key_id: Option<String>,
    /// Last-accepted counter carried over from provisioning.
    #[serde(default)]
    pub counter: u64,
    /// Deactivated chips are seeded too; they keep their history.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// One chip-artwork binding in the seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedLink {
    /// Tag of the bound chip.
    pub tag_id: String,
    /// The artwork the chip authenticates.
    pub artwork_id: String,
}

/// One artwork-owner entry in the seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedOwner {
    /// The owned artwork.
    pub artwork_id: String,
    /// Current owner handle shown to scanners.
    pub handle: String,
}

/// The full seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySeed {
    /// Registered chips.
    #[serde(default)]
    pub chips: Vec<SeedChip>,
    /// Chip-artwork bindings.
    #[serde(default)]
    pub links: Vec<SeedLink>,
    /// Artwork owner handles.
    #[serde(default)]
    pub owners: Vec<SeedOwner>,
}

impl RegistrySeed {
    /// Parse a seed document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a seed document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Populate a directory from this document.
    ///
    /// Returns the number of chips registered.
    ///
    /// # Errors
    /// * `SeedError::UnknownTag` - a link references a tag not present in
    ///   `chips`
    pub fn populate(&self, directory: &InMemoryChipDirectory) -> Result<usize, SeedError> {
        let mut ids: HashMap<&str, ChipId> = HashMap::new();

        for entry in &self.chips {
            let chip = Chip {
                id: ChipId::random(),
                tag_id: TagId::from(entry.tag_id.as_str()),
                secret: entry
                    .secret
                    .as_ref()
                    .map(|s| ChipSecret::new(s.as_bytes().to_vec())),
                key_id: entry.key_id.clone(),
                counter: entry.counter,
                active: entry.active,
            };
            ids.insert(entry.tag_id.as_str(), chip.id);
            directory.register_chip(chip);
        }

        for link in &self.links {
            let chip_id = ids
                .get(link.tag_id.as_str())
                .copied()
                .ok_or_else(|| SeedError::UnknownTag(link.tag_id.clone()))?;
            directory.bind_artwork(ChipArtworkLink {
                chip_id,
                artwork_id: ArtworkId::from(link.artwork_id.as_str()),
            });
        }

        for owner in &self.owners {
            directory.set_owner_handle(
                ArtworkId::from(owner.artwork_id.as_str()),
                owner.handle.clone(),
            );
        }

        info!(
            chips = self.chips.len(),
            links = self.links.len(),
            owners = self.owners.len(),
            "registry seeded"
        );
        Ok(self.chips.len())
    }
}
