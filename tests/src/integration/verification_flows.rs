//! # Verification Flow Tests
//!
//! Exercises the full state machine over the real in-memory adapters:
//! signature validation, replay protection, link resolution, and the audit
//! trail, including the worked scanner examples from the wire contract.

#[cfg(test)]
mod tests {
    use crate::support::{empty_stack, link_artwork, register_chip, Stack};
    use cs_01_chip_verify::{
        compute_signature, ChipVerificationApi, ScanContext, ScanRequest, ScanVerdict,
        SignatureVerifier, VerifyError,
    };
    use shared_types::{ArtworkId, ChipSecret, ScanState, TagId};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn signed_scan(tag: &str, secret: &str, ctr: &str) -> ScanRequest {
        let secret = ChipSecret::new(secret.as_bytes().to_vec());
        ScanRequest {
            tag_id: Some(tag.to_owned()),
            signature: Some(compute_signature(&secret, &TagId::from(tag), ctr)),
            counter: Some(ctr.to_owned()),
            key_id: None,
            page_artwork_id: None,
        }
    }

    fn production_stack() -> Stack {
        empty_stack(SignatureVerifier::Production)
    }

    async fn verify(stack: &Stack, request: ScanRequest) -> ScanVerdict {
        stack
            .service
            .verify_scan(request, ScanContext::default())
            .await
            .unwrap()
    }

    // =============================================================================
    // WORKED EXAMPLES
    // =============================================================================

    /// Fresh counter, valid signature, no artwork context: authentic with a
    /// null link, and the stored counter advances to the presented value.
    #[tokio::test]
    async fn authentic_scan_without_link() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);

        let verdict = verify(&stack, signed_scan("TAG123", "s3cr3t", "2")).await;
        assert_eq!(
            verdict,
            ScanVerdict::Accepted {
                state: ScanState::Authentic,
                linked_artwork_id: None,
                owner_handle: None,
            }
        );
        assert_eq!(stack.directory.stored_counter(chip_id), Some(2));
    }

    /// Replaying the accepted request verbatim must classify as cloned and
    /// leave the counter untouched.
    #[tokio::test]
    async fn immediate_replay_is_cloned() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);

        let request = signed_scan("TAG123", "s3cr3t", "2");
        let first = verify(&stack, request.clone()).await;
        assert_eq!(first.state(), ScanState::Authentic);

        let second = verify(&stack, request).await;
        assert_eq!(
            second,
            ScanVerdict::Rejected {
                state: ScanState::Cloned
            }
        );
        assert_eq!(stack.directory.stored_counter(chip_id), Some(2));
    }

    /// Strictly increasing counters are all accepted; gaps are fine, the
    /// rule is strict increase, not succession.
    #[tokio::test]
    async fn increasing_counters_are_all_accepted() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 0);

        for ctr in ["1", "2", "7"] {
            let verdict = verify(&stack, signed_scan("TAG123", "s3cr3t", ctr)).await;
            assert_ne!(verdict.state(), ScanState::Cloned, "counter {ctr}");
        }
        assert_eq!(stack.directory.stored_counter(chip_id), Some(7));
    }

    /// Chip linked to X, caller asserts Y: mismatch, reporting the real
    /// link and its owner. The counter still advances - the chip itself is
    /// genuine.
    #[tokio::test]
    async fn wrong_artwork_is_a_mismatch() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);
        link_artwork(&stack, chip_id, "art-X", "@owner_x");

        let mut request = signed_scan("TAG123", "s3cr3t", "2");
        request.page_artwork_id = Some("art-Y".into());

        let verdict = verify(&stack, request).await;
        assert_eq!(
            verdict,
            ScanVerdict::Accepted {
                state: ScanState::Mismatch,
                linked_artwork_id: Some(ArtworkId::from("art-X")),
                owner_handle: Some("@owner_x".into()),
            }
        );
        assert_eq!(stack.directory.stored_counter(chip_id), Some(2));
    }

    #[tokio::test]
    async fn matching_artwork_is_authentic() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);
        link_artwork(&stack, chip_id, "art-X", "@owner_x");

        let mut request = signed_scan("TAG123", "s3cr3t", "2");
        request.page_artwork_id = Some("art-X".into());

        let verdict = verify(&stack, request).await;
        assert_eq!(verdict.state(), ScanState::Authentic);
    }

    /// An unlinked chip with an asserted artwork still verifies as
    /// authentic with a null link: registration in progress is not a
    /// failure.
    #[tokio::test]
    async fn unlinked_chip_with_assertion_is_authentic() {
        let stack = production_stack();
        register_chip(&stack, "TAG123", "s3cr3t", 0);

        let mut request = signed_scan("TAG123", "s3cr3t", "1");
        request.page_artwork_id = Some("art-Y".into());

        let verdict = verify(&stack, request).await;
        assert_eq!(
            verdict,
            ScanVerdict::Accepted {
                state: ScanState::Authentic,
                linked_artwork_id: None,
                owner_handle: None,
            }
        );
    }

    // =============================================================================
    // REJECTION PATHS
    // =============================================================================

    #[tokio::test]
    async fn unknown_tag_is_invalid_and_mutates_nothing() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);

        let verdict = verify(&stack, signed_scan("GHOST", "s3cr3t", "2")).await;
        assert_eq!(
            verdict,
            ScanVerdict::Rejected {
                state: ScanState::Invalid
            }
        );
        assert_eq!(stack.directory.stored_counter(chip_id), Some(1));

        let events = stack.scan_log.all_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].chip_id, None);
    }

    #[tokio::test]
    async fn tampered_signature_is_invalid() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);

        let mut request = signed_scan("TAG123", "s3cr3t", "2");
        // Wrong key entirely
        request.signature = Some(compute_signature(
            &ChipSecret::new(b"wrong".to_vec()),
            &TagId::from("TAG123"),
            "2",
        ));

        let verdict = verify(&stack, request).await;
        assert_eq!(verdict.state(), ScanState::Invalid);
        assert_eq!(stack.directory.stored_counter(chip_id), Some(1));
        assert_eq!(stack.scan_log.all_events()[0].chip_id, Some(chip_id));
    }

    #[tokio::test]
    async fn deactivated_chip_is_invalid() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);
        assert!(stack.directory.deactivate(chip_id));

        let verdict = verify(&stack, signed_scan("TAG123", "s3cr3t", "2")).await;
        assert_eq!(verdict.state(), ScanState::Invalid);
        assert_eq!(stack.directory.stored_counter(chip_id), Some(1));
    }

    /// An unparseable counter is a client error, not a scan outcome: no
    /// chip-associated audit event and no counter mutation.
    #[tokio::test]
    async fn unparseable_counter_is_a_client_error() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);

        let request = signed_scan("TAG123", "s3cr3t", "abc");
        let result = stack
            .service
            .verify_scan(request, ScanContext::default())
            .await;
        assert!(matches!(result, Err(VerifyError::BadCounter)));
        assert_eq!(stack.directory.stored_counter(chip_id), Some(1));
        assert_eq!(stack.scan_log.event_count(), 0);
    }

    /// Missing required fields reject the request but still leave an
    /// invalid event carrying the asserted artwork for fraud-pattern
    /// visibility.
    #[tokio::test]
    async fn missing_params_are_rejected_but_logged() {
        let stack = production_stack();

        let request = ScanRequest {
            page_artwork_id: Some("art-X".into()),
            ..ScanRequest::default()
        };
        let result = stack
            .service
            .verify_scan(request, ScanContext::default())
            .await;
        assert!(matches!(result, Err(VerifyError::MissingParams)));

        let events = stack.scan_log.all_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].state, ScanState::Invalid);
        assert_eq!(events[0].chip_id, None);
        assert_eq!(events[0].artwork_id, Some(ArtworkId::from("art-X")));
    }

    // =============================================================================
    // AUDIT TRAIL
    // =============================================================================

    /// Every classified attempt appends exactly one event; the trail has
    /// no gaps.
    #[tokio::test]
    async fn audit_trail_is_gapless() {
        let stack = production_stack();
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 0);

        verify(&stack, signed_scan("TAG123", "s3cr3t", "1")).await; // authentic
        verify(&stack, signed_scan("TAG123", "s3cr3t", "1")).await; // cloned
        verify(&stack, signed_scan("GHOST", "s3cr3t", "1")).await; // invalid

        let events = stack.scan_log.all_events();
        let states: Vec<ScanState> = events.iter().map(|e| e.state).collect();
        assert_eq!(
            states,
            vec![ScanState::Authentic, ScanState::Cloned, ScanState::Invalid]
        );
        assert_eq!(events[0].chip_id, Some(chip_id));
        assert_eq!(events[2].chip_id, None);
    }

    #[tokio::test]
    async fn history_is_served_newest_first_per_tag() {
        let stack = production_stack();
        register_chip(&stack, "TAG123", "s3cr3t", 0);

        verify(&stack, signed_scan("TAG123", "s3cr3t", "1")).await;
        verify(&stack, signed_scan("TAG123", "s3cr3t", "1")).await;

        let history = stack.service.scan_history("TAG123", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].state, ScanState::Cloned);
        assert_eq!(history[1].state, ScanState::Authentic);

        assert!(stack
            .service
            .scan_history("GHOST", 10)
            .await
            .unwrap()
            .is_empty());
    }

    // =============================================================================
    // DEVELOPMENT BYPASS
    // =============================================================================

    /// Secretless chips verify against the operator bypass value only in
    /// the development variant.
    #[tokio::test]
    async fn dev_bypass_verifies_secretless_chips() {
        let stack = empty_stack(SignatureVerifier::Development {
            bypass_code: "open-sesame".into(),
        });
        let chip = shared_types::Chip {
            id: shared_types::ChipId::random(),
            tag_id: TagId::from("DEV-1"),
            secret: None,
            key_id: None,
            counter: 0,
            active: true,
        };
        stack.directory.register_chip(chip);

        let request = ScanRequest {
            tag_id: Some("DEV-1".into()),
            signature: Some("open-sesame".into()),
            counter: Some("1".into()),
            key_id: None,
            page_artwork_id: None,
        };
        let verdict = verify(&stack, request.clone()).await;
        assert_eq!(verdict.state(), ScanState::Authentic);

        // Same chip in production mode never verifies
        let production = production_stack();
        production.directory.register_chip(shared_types::Chip {
            id: shared_types::ChipId::random(),
            tag_id: TagId::from("DEV-1"),
            secret: None,
            key_id: None,
            counter: 0,
            active: true,
        });
        let verdict = verify(&production, request).await;
        assert_eq!(verdict.state(), ScanState::Invalid);
    }
}
