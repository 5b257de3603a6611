//! HTTP server facade for liber with Axum, error handling, and the
//! shared `/catalog` routing surface.

use anyhow::Context;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use liber_kernel::ModuleRegistry;

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &liber_kernel::settings::Settings,
) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &liber_kernel::settings::Settings,
) -> Router {
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    router_builder = router_builder
        .route("/", get(|| async { found(router::CATALOG_PREFIX) }))
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under {}",
            router::CATALOG_PREFIX
        );
        router_builder = router_builder.mount_module(module.routes());
    }

    // Unknown paths forward to the shared error page.
    router_builder.fallback(not_found).build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Catch-all for unrouted paths
async fn not_found(uri: axum::http::Uri) -> error::AppError {
    error::AppError::not_found(format!("No route for {uri}"))
}

/// Build a `302 Found` redirect to the given location.
///
/// The catalog redirects with 302 after create/update/delete flows;
/// axum's `Redirect` helpers only offer 303/307/308.
pub fn found(location: &str) -> Response {
    match header::HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
