//! Shared fixtures: a seeded registry plus a fully wired orchestrator.

use cs_01_chip_verify::{
    ChipDirectory, ChipVerificationService, ScanEventSink, SignatureVerifier,
};
use cs_02_chip_registry::{InMemoryChipDirectory, InMemoryScanLog};
use shared_types::{ArtworkId, Chip, ChipArtworkLink, ChipId, ChipSecret, TagId};
use std::sync::Arc;
use std::time::Duration;

/// A wired verification stack with handles onto its adapters.
pub struct Stack {
    pub directory: Arc<InMemoryChipDirectory>,
    pub scan_log: Arc<InMemoryScanLog>,
    pub service: Arc<ChipVerificationService>,
}

/// Build a stack with the given verifier variant and no chips registered.
pub fn empty_stack(verifier: SignatureVerifier) -> Stack {
    let directory = Arc::new(InMemoryChipDirectory::new());
    let scan_log = Arc::new(InMemoryScanLog::new());
    let service = Arc::new(ChipVerificationService::new(
        Arc::clone(&directory) as Arc<dyn ChipDirectory>,
        Arc::clone(&scan_log) as Arc<dyn ScanEventSink>,
        verifier,
        Duration::from_secs(2),
    ));
    Stack {
        directory,
        scan_log,
        service,
    }
}

/// Register a chip with an HMAC secret, returning its id.
pub fn register_chip(stack: &Stack, tag: &str, secret: &str, counter: u64) -> ChipId {
    let chip = Chip {
        id: ChipId::random(),
        tag_id: TagId::from(tag),
        secret: Some(ChipSecret::new(secret.as_bytes().to_vec())),
        key_id: None,
        counter,
        active: true,
    };
    let id = chip.id;
    stack.directory.register_chip(chip);
    id
}

/// Bind a chip to an artwork and record its owner handle.
pub fn link_artwork(stack: &Stack, chip_id: ChipId, artwork: &str, owner: &str) {
    stack.directory.bind_artwork(ChipArtworkLink {
        chip_id,
        artwork_id: ArtworkId::from(artwork),
    });
    stack
        .directory
        .set_owner_handle(ArtworkId::from(artwork), owner);
}
