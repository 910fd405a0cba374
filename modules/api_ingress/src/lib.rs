//! HTTP ingress: owns the axum server, the global middleware stack and the
//! process-wide endpoints (`/health`, `/openapi.json`). Modules contribute
//! their routes as a plain `Router`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Main API ingress: wraps module routes with the shared middleware and serves them.
pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: Option<Arc<serde_json::Value>>,
}

impl ApiIngress {
    /// Create a new ApiIngress instance with the given configuration
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            openapi: None,
        }
    }

    /// Publish `doc` at `/openapi.json`.
    pub fn with_openapi(mut self, doc: serde_json::Value) -> Self {
        self.openapi = Some(Arc::new(doc));
        self
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Build the HTTP router around the routes contributed by modules
    pub fn build_router(&self, routes: Router) -> Router {
        let mut router = routes
            .route("/health", get(web::health_check))
            .fallback(web::not_found);

        if let Some(doc) = self.openapi.clone() {
            router = router.route(
                "/openapi.json",
                get(move || web::serve_openapi(doc.clone())),
            );
        }

        // The last layer added runs first. Effective order per request:
        // PropagateRequestId -> SetRequestId -> Trace -> record_request_id -> Timeout -> CORS -> BodyLimit

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        if let Some(timeout) = self.config.request_timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }

        router = router
            .layer(from_fn(request_id::record_request_id))
            .layer(request_id::trace_layer())
            .layer(SetRequestIdLayer::new(
                request_id::X_REQUEST_ID,
                request_id::NanoRequestId,
            ))
            .layer(PropagateRequestIdLayer::new(request_id::X_REQUEST_ID));

        tracing::debug!(
            cors = self.config.cors_enabled,
            body_limit = self.config.body_limit_bytes,
            timeout = ?self.config.request_timeout,
            "HTTP router built"
        );
        router
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(&self, routes: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self
            .config
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.config.bind_addr))?;

        let router = self.build_router(routes);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
