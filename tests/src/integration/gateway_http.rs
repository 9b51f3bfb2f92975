//! # Gateway HTTP Round-Trips
//!
//! Full-stack tests: HTTP request → gateway router → orchestrator → real
//! in-memory adapters, exercising the exact wire contract scanner clients
//! see.

#[cfg(test)]
mod tests {
    use crate::support::{empty_stack, link_artwork, register_chip, Stack};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use cs_01_chip_verify::{compute_signature, ChipVerificationApi, SignatureVerifier};
    use cs_03_api_gateway::{ApiGatewayService, GatewayConfig};
    use http_body_util::BodyExt;
    use shared_types::{ChipSecret, TagId};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn gateway_router(stack: &Stack) -> Router {
        let service = ApiGatewayService::new(
            GatewayConfig::default(),
            Arc::clone(&stack.service) as Arc<dyn ChipVerificationApi>,
        )
        .unwrap();
        service.router()
    }

    fn signature(tag: &str, secret: &str, ctr: &str) -> String {
        compute_signature(
            &ChipSecret::new(secret.as_bytes().to_vec()),
            &TagId::from(tag),
            ctr,
        )
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn get_verify_round_trip_is_authentic() {
        let stack = empty_stack(SignatureVerifier::Production);
        register_chip(&stack, "TAG123", "s3cr3t", 1);

        let sig = signature("TAG123", "s3cr3t", "2");
        let uri = format!("/api/chip/verify?a=TAG123&c={sig}&ctr=2");
        let (status, json) = get_json(gateway_router(&stack), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["state"], "authentic");
        assert!(json["linked_artwork_id"].is_null());
    }

    #[tokio::test]
    async fn replayed_request_round_trips_as_cloned() {
        let stack = empty_stack(SignatureVerifier::Production);
        register_chip(&stack, "TAG123", "s3cr3t", 1);

        let sig = signature("TAG123", "s3cr3t", "2");
        let uri = format!("/api/chip/verify?a=TAG123&c={sig}&ctr=2");

        let (status, json) = get_json(gateway_router(&stack), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"], "authentic");

        let (status, json) = get_json(gateway_router(&stack), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], false);
        assert_eq!(json["state"], "cloned");
    }

    #[tokio::test]
    async fn mismatch_reports_link_and_owner() {
        let stack = empty_stack(SignatureVerifier::Production);
        let chip_id = register_chip(&stack, "TAG123", "s3cr3t", 1);
        link_artwork(&stack, chip_id, "art-X", "@owner_x");

        let sig = signature("TAG123", "s3cr3t", "2");
        let uri = format!("/api/chip/verify?a=TAG123&c={sig}&ctr=2&page_artwork_id=art-Y");
        let (status, json) = get_json(gateway_router(&stack), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["state"], "mismatch");
        assert_eq!(json["linked_artwork_id"], "art-X");
        assert_eq!(json["owner_handle"], "@owner_x");
    }

    #[tokio::test]
    async fn bad_counter_is_http_400() {
        let stack = empty_stack(SignatureVerifier::Production);
        register_chip(&stack, "TAG123", "s3cr3t", 1);

        let sig = signature("TAG123", "s3cr3t", "abc");
        let uri = format!("/api/chip/verify?a=TAG123&c={sig}&ctr=abc");
        let (status, json) = get_json(gateway_router(&stack), &uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "bad_counter");
        // No chip-associated audit event for the client error
        assert_eq!(stack.scan_log.event_count(), 0);
    }

    #[tokio::test]
    async fn missing_params_is_http_400_and_still_audited() {
        let stack = empty_stack(SignatureVerifier::Production);

        let (status, json) =
            get_json(gateway_router(&stack), "/api/chip/verify?page_artwork_id=art-1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "missing_params");
        assert_eq!(stack.scan_log.event_count(), 1);
    }

    #[tokio::test]
    async fn post_json_body_round_trips() {
        let stack = empty_stack(SignatureVerifier::Production);
        register_chip(&stack, "TAG123", "s3cr3t", 1);

        let body = serde_json::json!({
            "a": "TAG123",
            "c": signature("TAG123", "s3cr3t", "2"),
            "ctr": "2",
        });
        let response = gateway_router(&stack)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chip/verify")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["state"], "authentic");
    }

    #[tokio::test]
    async fn cors_preflight_succeeds_with_no_body() {
        let stack = empty_stack(SignatureVerifier::Production);

        let response = gateway_router(&stack)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/chip/verify")
                    .header("origin", "https://market.chipseal.art")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn history_round_trip() {
        let stack = empty_stack(SignatureVerifier::Production);
        register_chip(&stack, "TAG123", "s3cr3t", 0);

        let sig = signature("TAG123", "s3cr3t", "1");
        let uri = format!("/api/chip/verify?a=TAG123&c={sig}&ctr=1");
        let (status, _) = get_json(gateway_router(&stack), &uri).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) =
            get_json(gateway_router(&stack), "/api/chip/history?a=TAG123&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["events"].as_array().unwrap().len(), 1);
        assert_eq!(json["events"][0]["state"], "authentic");
    }

    #[tokio::test]
    async fn unknown_routes_are_404() {
        let stack = empty_stack(SignatureVerifier::Production);
        let response = gateway_router(&stack)
            .oneshot(
                Request::builder()
                    .uri("/api/chip/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
