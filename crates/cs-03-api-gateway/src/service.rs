//! API Gateway service - builds the router and serves it.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::create_cors_layer;
use crate::routes::{self, AppState};
use axum::{
    routing::get,
    Router,
};
use cs_01_chip_verify::ChipVerificationApi;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(
        config: GatewayConfig,
        api: Arc<dyn ChipVerificationApi>,
    ) -> Result<Self, GatewayError> {
        // Validate configuration
        config.validate()?;

        let state = AppState {
            api,
            history_limit: config.limits.history_limit,
        };

        Ok(Self { config, state })
    }

    /// Build the HTTP router with the middleware stack applied.
    pub fn router(&self) -> Router {
        // Layers are applied individually (outermost applied last) rather than
        // via a single `ServiceBuilder` so that each `Router::layer` call
        // re-erases the response body to `axum::body::Body`. Bundling these
        // body-wrapping tower-http layers into one `ServiceBuilder` would make
        // the outer `CorsLayer` see a non-`Default` response body. Execution
        // order is unchanged: CORS → trace → timeout → body limit → route.
        Router::new()
            .route(
                "/api/chip/verify",
                get(routes::verify_get).post(routes::verify_post),
            )
            .route("/api/chip/history", get(routes::history))
            .route("/health", get(routes::health))
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_request_size))
            .layer(TimeoutLayer::new(self.config.timeouts.request))
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config.cors))
            .with_state(self.state.clone())
    }

    /// Serve until the shutdown future resolves.
    pub async fn serve(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        info!(addr = %addr, "Starting HTTP server");

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| GatewayError::Serve(e.to_string()))
    }
}
