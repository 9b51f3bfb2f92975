//! In-memory chip directory and scan log.
//!
//! The directory keeps three point-lookup tables (tag index, chip rows,
//! links) plus the owner-handle table used for display enrichment. The one
//! synchronized mutation is `advance_counter`: `DashMap::get_mut` holds the
//! row exclusively for the duration of the compare-and-swap, which makes
//! the accept-and-advance step linearizable per chip.

use cs_01_chip_verify::ports::outbound::{
    AuditError, ChipDirectory, CounterUpdate, DirectoryError, ScanEventSink,
};
use dashmap::DashMap;
use parking_lot::RwLock;
use shared_types::{
    ArtworkId, Chip, ChipArtworkLink, ChipId, NewScanEvent, ScanEvent, TagId,
};
use tracing::debug;
use uuid::Uuid;

/// Chip registry tables held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryChipDirectory {
    by_tag: DashMap<TagId, ChipId>,
    chips: DashMap<ChipId, Chip>,
    links: DashMap<ChipId, ChipArtworkLink>,
    owners: DashMap<ArtworkId, String>,
}

impl InMemoryChipDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chip, replacing any previous registration of the same
    /// tag. Provisioning-side helper; the verification core never writes
    /// through this path.
    pub fn register_chip(&self, chip: Chip) {
        debug!(tag = %chip.tag_id, chip = %chip.id, "registering chip");
        self.by_tag.insert(chip.tag_id.clone(), chip.id);
        self.chips.insert(chip.id, chip);
    }

    /// Bind a chip to the artwork it authenticates. At most one active
    /// link per chip; a rebind replaces the previous link.
    pub fn bind_artwork(&self, link: ChipArtworkLink) {
        self.links.insert(link.chip_id, link);
    }

    /// Record the current owner handle of an artwork.
    pub fn set_owner_handle(&self, artwork_id: ArtworkId, handle: impl Into<String>) {
        self.owners.insert(artwork_id, handle.into());
    }

    /// Deactivate a chip (compromise response). The row is kept so the
    /// audit trail stays coherent. Returns false for an unknown chip.
    pub fn deactivate(&self, chip_id: ChipId) -> bool {
        match self.chips.get_mut(&chip_id) {
            Some(mut chip) => {
                chip.active = false;
                true
            }
            None => false,
        }
    }

    /// Number of registered chips.
    #[must_use]
    pub fn chip_count(&self) -> usize {
        self.chips.len()
    }

    /// Stored counter of a chip; test and diagnostics helper.
    #[must_use]
    pub fn stored_counter(&self, chip_id: ChipId) -> Option<u64> {
        self.chips.get(&chip_id).map(|chip| chip.counter)
    }
}

#[async_trait::async_trait]
impl ChipDirectory for InMemoryChipDirectory {
    async fn chip_by_tag(&self, tag_id: &TagId) -> Result<Option<Chip>, DirectoryError> {
        let chip_id = match self.by_tag.get(tag_id) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.chips.get(&chip_id).map(|chip| chip.value().clone()))
    }

    async fn link_for_chip(
        &self,
        chip_id: ChipId,
    ) -> Result<Option<ChipArtworkLink>, DirectoryError> {
        Ok(self.links.get(&chip_id).map(|link| link.value().clone()))
    }

    async fn owner_handle(
        &self,
        artwork_id: &ArtworkId,
    ) -> Result<Option<String>, DirectoryError> {
        Ok(self
            .owners
            .get(artwork_id)
            .map(|handle| handle.value().clone()))
    }

    async fn advance_counter(
        &self,
        chip_id: ChipId,
        expected_prior: u64,
        new_value: u64,
    ) -> Result<CounterUpdate, DirectoryError> {
        // get_mut holds the row's shard write lock across the
        // check-and-write, so concurrent attempts serialize here.
        let mut chip = self
            .chips
            .get_mut(&chip_id)
            .ok_or_else(|| DirectoryError::Query(format!("unknown chip {chip_id}")))?;

        if chip.counter != expected_prior {
            return Ok(CounterUpdate::Conflict {
                current: chip.counter,
            });
        }
        chip.counter = new_value;
        Ok(CounterUpdate::Advanced)
    }
}

/// Append-only in-memory scan log.
#[derive(Debug, Default)]
pub struct InMemoryScanLog {
    events: RwLock<Vec<ScanEvent>>,
}

impl InMemoryScanLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of recorded events, regardless of chip.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    /// Snapshot of every recorded event, oldest first. Test helper.
    #[must_use]
    pub fn all_events(&self) -> Vec<ScanEvent> {
        self.events.read().clone()
    }
}

#[async_trait::async_trait]
impl ScanEventSink for InMemoryScanLog {
    async fn record_scan(&self, event: NewScanEvent) -> Result<ScanEvent, AuditError> {
        let recorded = ScanEvent {
            id: Uuid::new_v4(),
            chip_id: event.chip_id,
            artwork_id: event.artwork_id,
            state: event.state,
            ip: event.ip,
            user_agent: event.user_agent,
            created_at: chrono::Utc::now(),
        };
        self.events.write().push(recorded.clone());
        Ok(recorded)
    }

    async fn recent_scans(
        &self,
        chip_id: ChipId,
        limit: usize,
    ) -> Result<Vec<ScanEvent>, AuditError> {
        let events = self.events.read();
        Ok(events
            .iter()
            .rev()
            .filter(|event| event.chip_id == Some(chip_id))
            .take(limit)
            .cloned()
            .collect())
    }
}
