//! Route handlers wiring HTTP onto the verification inbound port.
//!
//! The handlers translate transport details (query/body schema, client
//! address, user agent) into the orchestrator's request types and map the
//! verdict/error taxonomy onto the wire contract. No business logic lives
//! here.

use crate::domain::types::{
    AcceptedBody, ErrorBody, HealthBody, HistoryBody, HistoryParams, RejectedBody, VerifyParams,
};
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cs_01_chip_verify::{ChipVerificationApi, ScanContext, ScanVerdict, VerifyError};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::error;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The verification orchestrator behind its inbound port.
    pub api: Arc<dyn ChipVerificationApi>,
    /// Cap applied to history queries.
    pub history_limit: usize,
}

/// `GET /api/chip/verify` - parameters in the query string.
pub async fn verify_get(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Query(params): Query<VerifyParams>,
) -> Response {
    let ctx = scan_context(&headers, connect_info);
    run_verify(&state, params, ctx).await
}

/// `POST /api/chip/verify` - parameters as a JSON body.
///
/// A missing or malformed body is treated like a request with no fields:
/// the orchestrator classifies it as missing parameters (and still logs
/// the attempt) instead of surfacing a serde error.
pub async fn verify_post(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<VerifyParams>, JsonRejection>,
) -> Response {
    let params = match payload {
        Ok(Json(params)) => params,
        Err(_) => VerifyParams::default(),
    };
    let ctx = scan_context(&headers, connect_info);
    run_verify(&state, params, ctx).await
}

/// `GET /api/chip/history?a=<tag>&limit=<n>` - recent scans, newest first.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let Some(tag) = params.a.filter(|a| !a.is_empty()) else {
        return client_error("missing_params");
    };
    let limit = params
        .limit
        .unwrap_or(state.history_limit)
        .min(state.history_limit);

    match state.api.scan_history(&tag, limit).await {
        Ok(events) => (
            StatusCode::OK,
            Json(HistoryBody {
                ok: true,
                events: events.into_iter().map(Into::into).collect(),
            }),
        )
            .into_response(),
        Err(e) => verify_error_response(&e),
    }
}

/// `GET /health` - liveness probe.
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(HealthBody {
            status: "ok",
            service: "chipseal-api-gateway",
            version: crate::VERSION,
        }),
    )
        .into_response()
}

async fn run_verify(state: &AppState, params: VerifyParams, ctx: ScanContext) -> Response {
    match state.api.verify_scan(params.into(), ctx).await {
        Ok(verdict) => verdict_response(verdict),
        Err(e) => verify_error_response(&e),
    }
}

fn verdict_response(verdict: ScanVerdict) -> Response {
    match verdict {
        ScanVerdict::Accepted {
            state,
            linked_artwork_id,
            owner_handle,
        } => (
            StatusCode::OK,
            Json(AcceptedBody {
                ok: true,
                state,
                linked_artwork_id: linked_artwork_id.map(|id| id.0),
                owner_handle,
            }),
        )
            .into_response(),
        ScanVerdict::Rejected { state } => {
            (StatusCode::OK, Json(RejectedBody { ok: false, state })).into_response()
        }
    }
}

fn verify_error_response(error: &VerifyError) -> Response {
    match error {
        VerifyError::MissingParams => client_error("missing_params"),
        VerifyError::BadCounter => client_error("bad_counter"),
        VerifyError::Directory(_) | VerifyError::Audit(_) | VerifyError::Timeout(_) => {
            error!(%error, "verification failed on a collaborator");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    ok: false,
                    error: "server_error",
                }),
            )
                .into_response()
        }
    }
}

fn client_error(code: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            ok: false,
            error: code,
        }),
    )
        .into_response()
}

/// Assemble the transport metadata recorded into the audit trail.
fn scan_context(headers: &HeaderMap, connect_info: Option<ConnectInfo<SocketAddr>>) -> ScanContext {
    ScanContext {
        ip: client_ip(headers, connect_info),
        user_agent: headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|ua| ua.to_str().ok())
            .map(str::to_owned),
    }
}

/// Client address: first X-Forwarded-For entry when a proxy supplied one,
/// otherwise the peer address.
fn client_ip(headers: &HeaderMap, connect_info: Option<ConnectInfo<SocketAddr>>) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return Some(ip);
                }
            }
        }
    }
    connect_info.map(|info| info.0.ip())
}
