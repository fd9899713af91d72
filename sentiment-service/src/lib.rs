//! # sentiment-service
//!
//! Exposes `GET /api/sentiment?text=...`, which classifies the given text as
//! `negative`, `positive` or `neutral` by keyword lookup and answers with
//! `{"sentiment": "<label>"}`.
//!
//! The operation is declared through `sentiment-core` metadata; the OpenAPI
//! document and the router are both derived from what the modules here
//! register.

use axum::Router;
use sentiment_core::bootstrap::{self, ServiceInfo};
use sentiment_core::error::Result;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::openapi::OpenApi;

pub mod classifier;
pub mod config;
pub mod dtos;
pub mod handlers;

use config::ServerConfig;

pub const SERVICE_INFO: ServiceInfo = ServiceInfo {
    title: "sentiment-service",
    version: env!("CARGO_PKG_VERSION"),
    description: "Keyword-based sentiment classification API",
    tag: "Sentiment",
};

/// Makes sure the registrations in this crate are linked into the binary.
pub fn load() {
    dtos::load();
    handlers::load();
}

pub fn build_openapi_spec() -> OpenApi {
    load();
    bootstrap::build_openapi_from_inventory(&SERVICE_INFO)
}

pub fn build_rest_router(openapi: OpenApi) -> Result<Router> {
    bootstrap::rest_router_from_openapi(openapi)
}

pub fn default_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// The complete application router, with tracing and CORS layers.
pub fn app() -> Result<Router> {
    let router = build_rest_router(build_openapi_spec())?
        .layer(TraceLayer::new_for_http())
        .layer(default_cors_layer());
    Ok(router)
}

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("info,{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn run_server(config: &ServerConfig) -> Result<()> {
    let app = app()?;

    let address = config.address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "sentiment service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sentiment service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
