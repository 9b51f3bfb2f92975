//! # Verification Orchestrator
//!
//! Application service implementing [`ChipVerificationApi`]. Composes the
//! domain checks into the authenticity state machine and owns the two side
//! effects: the atomic counter advance and the audit append.
//!
//! ## State Machine (first matching rule wins)
//!
//! ```text
//! missing tag/signature/counter ──→ MissingParams (400), attempt logged
//! unknown tag ─────────────────────→ invalid  (event: chip_id = null)
//! deactivated chip ────────────────→ invalid  (event: resolved chip)
//! signature fails ─────────────────→ invalid  (event: resolved chip)
//! counter unparseable ─────────────→ BadCounter (400), no scan event
//! counter ≤ stored ────────────────→ cloned   (counter NOT advanced)
//! otherwise ───────────────────────→ authentic | mismatch
//!                                    (counter advanced atomically)
//! ```
//!
//! Every classified outcome appends exactly one scan event. Only the final
//! transition mutates the chip's counter, and a lost compare-and-swap race
//! re-classifies the attempt as `cloned` so two concurrent scans can never
//! both be accepted.

use crate::domain::entities::{ScanContext, ScanRequest, ScanVerdict};
use crate::domain::errors::VerifyError;
use crate::domain::link::resolve_link;
use crate::domain::replay::{check_counter, parse_counter, ReplayDecision};
use crate::domain::signature::SignatureVerifier;
use crate::ports::inbound::ChipVerificationApi;
use crate::ports::outbound::{ChipDirectory, CounterUpdate, ScanEventSink};
use shared_types::{ArtworkId, ChipId, NewScanEvent, ScanEvent, ScanState, TagId};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Chip Verification Service.
///
/// Stateless between requests: chip secrets, counters, and links all live
/// behind the [`ChipDirectory`] port, injected once at startup together
/// with the scan-event sink and the startup-resolved verifier variant.
pub struct ChipVerificationService {
    directory: Arc<dyn ChipDirectory>,
    scan_log: Arc<dyn ScanEventSink>,
    verifier: SignatureVerifier,
    call_timeout: Duration,
}

impl ChipVerificationService {
    /// Create a new verification service.
    ///
    /// # Arguments
    /// * `directory` - chip registry collaborator
    /// * `scan_log` - append-only audit sink
    /// * `verifier` - signature verifier variant resolved at startup
    /// * `call_timeout` - deadline applied to every collaborator call
    pub fn new(
        directory: Arc<dyn ChipDirectory>,
        scan_log: Arc<dyn ScanEventSink>,
        verifier: SignatureVerifier,
        call_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            scan_log,
            verifier,
            call_timeout,
        }
    }

    /// Run a collaborator call under the configured deadline.
    async fn bounded<T, E, F>(&self, what: &'static str, fut: F) -> Result<T, VerifyError>
    where
        F: Future<Output = Result<T, E>> + Send,
        VerifyError: From<E>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result.map_err(VerifyError::from),
            Err(_) => Err(VerifyError::Timeout(what)),
        }
    }

    fn scan_event(
        chip_id: Option<ChipId>,
        artwork_id: Option<ArtworkId>,
        state: ScanState,
        ctx: &ScanContext,
    ) -> NewScanEvent {
        NewScanEvent {
            chip_id,
            artwork_id,
            state,
            ip: ctx.ip,
            user_agent: ctx.user_agent.clone(),
        }
    }

    /// Append a scan event for a classified outcome. A failure here is a
    /// server error: an unaudited verdict is a compliance gap.
    async fn record(
        &self,
        chip_id: Option<ChipId>,
        artwork_id: Option<ArtworkId>,
        state: ScanState,
        ctx: &ScanContext,
    ) -> Result<ScanEvent, VerifyError> {
        self.bounded(
            "record_scan",
            self.scan_log
                .record_scan(Self::scan_event(chip_id, artwork_id, state, ctx)),
        )
        .await
    }

    /// Display-only owner enrichment; never affects classification, so a
    /// failed or slow lookup degrades to `None`.
    async fn owner_of(&self, artwork_id: Option<&ArtworkId>) -> Option<String> {
        let artwork_id = artwork_id?;
        match self
            .bounded("owner_handle", self.directory.owner_handle(artwork_id))
            .await
        {
            Ok(handle) => handle,
            Err(error) => {
                warn!(artwork = %artwork_id, %error, "owner lookup failed; omitting handle");
                None
            }
        }
    }

    async fn reject(
        &self,
        chip_id: Option<ChipId>,
        artwork_id: Option<ArtworkId>,
        state: ScanState,
        ctx: &ScanContext,
    ) -> Result<ScanVerdict, VerifyError> {
        self.record(chip_id, artwork_id, state, ctx).await?;
        Ok(ScanVerdict::Rejected { state })
    }
}

#[async_trait::async_trait]
impl ChipVerificationApi for ChipVerificationService {
    async fn verify_scan(
        &self,
        request: ScanRequest,
        ctx: ScanContext,
    ) -> Result<ScanVerdict, VerifyError> {
        let asserted = request.asserted_artwork();

        // Rule 1: presence of the required trio. The attempt is still
        // recorded (best effort) for fraud-pattern visibility before the
        // client error goes back.
        let Some((tag_raw, presented_sig, counter_raw)) = request.required_fields() else {
            if let Err(error) = self
                .record(None, asserted.clone(), ScanState::Invalid, &ctx)
                .await
            {
                warn!(%error, "failed to log missing-parameter attempt");
            }
            return Err(VerifyError::MissingParams);
        };
        let tag_id = TagId::from(tag_raw);

        // Rule 2: the tag must resolve to a known chip.
        let chip = self
            .bounded("chip_by_tag", self.directory.chip_by_tag(&tag_id))
            .await?;
        let Some(chip) = chip else {
            debug!(tag = %tag_id, "scan for unknown tag");
            return self.reject(None, asserted, ScanState::Invalid, &ctx).await;
        };

        // Rule 3: deactivated chips keep their history but never verify.
        if !chip.active {
            warn!(tag = %tag_id, chip = %chip.id, "scan against deactivated chip");
            return self
                .reject(Some(chip.id), asserted, ScanState::Invalid, &ctx)
                .await;
        }

        // Rule 4: the HMAC covers the raw counter string, so signature
        // verification precedes counter parsing.
        if !self
            .verifier
            .verify(chip.secret.as_ref(), &chip.tag_id, counter_raw, presented_sig)
        {
            debug!(tag = %tag_id, chip = %chip.id, "signature verification failed");
            return self
                .reject(Some(chip.id), asserted, ScanState::Invalid, &ctx)
                .await;
        }

        // Rule 5: counter must parse. A client error, not a scan outcome,
        // and deliberately not logged as one.
        let presented = parse_counter(counter_raw)?;

        // Rule 6: strict-increase replay protection.
        if let ReplayDecision::Replayed { stored, presented } =
            check_counter(chip.counter, presented)
        {
            warn!(
                tag = %tag_id,
                chip = %chip.id,
                stored,
                presented,
                "replayed counter; possible cloned chip"
            );
            return self
                .reject(Some(chip.id), asserted, ScanState::Cloned, &ctx)
                .await;
        }

        // Rule 7: resolve the artwork link, then accept-and-advance.
        let link = self
            .bounded("link_for_chip", self.directory.link_for_chip(chip.id))
            .await?;
        let resolution = resolve_link(
            link.as_ref().map(|l| &l.artwork_id),
            asserted.as_ref(),
        );
        let recorded_artwork = asserted
            .clone()
            .or_else(|| resolution.linked_artwork_id.clone());

        match self
            .bounded(
                "advance_counter",
                self.directory
                    .advance_counter(chip.id, chip.counter, presented),
            )
            .await?
        {
            CounterUpdate::Conflict { current } => {
                // A concurrent acceptance landed first; relative to the
                // new stored value this attempt is a replay.
                warn!(
                    tag = %tag_id,
                    chip = %chip.id,
                    current,
                    presented,
                    "lost counter race; classifying as cloned"
                );
                self.reject(Some(chip.id), recorded_artwork, ScanState::Cloned, &ctx)
                    .await
            }
            CounterUpdate::Advanced => {
                self.record(Some(chip.id), recorded_artwork, resolution.state, &ctx)
                    .await?;
                let owner_handle = self
                    .owner_of(resolution.linked_artwork_id.as_ref())
                    .await;
                debug!(
                    tag = %tag_id,
                    chip = %chip.id,
                    state = %resolution.state,
                    counter = presented,
                    "scan accepted"
                );
                Ok(ScanVerdict::Accepted {
                    state: resolution.state,
                    linked_artwork_id: resolution.linked_artwork_id,
                    owner_handle,
                })
            }
        }
    }

    async fn scan_history(
        &self,
        tag_id: &str,
        limit: usize,
    ) -> Result<Vec<ScanEvent>, VerifyError> {
        let tag_id = TagId::from(tag_id);
        let chip = self
            .bounded("chip_by_tag", self.directory.chip_by_tag(&tag_id))
            .await?;
        match chip {
            Some(chip) => {
                self.bounded("recent_scans", self.scan_log.recent_scans(chip.id, limit))
                    .await
            }
            None => Ok(Vec::new()),
        }
    }
}
