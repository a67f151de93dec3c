//! HTTP API gateway for SonjuTalk.
//!
//! Exposes the assistant over REST for app deployments. Stateless per
//! request: conversation history and quiz payloads travel in the request
//! body, so any instance can serve any user.
//!
//! Built on Axum. When a client disconnects mid-request, Axum drops the
//! handler future and the in-flight completion call is cancelled with it.

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use sonjutalk_assistant::Assistant;
use sonjutalk_config::AppConfig;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub assistant: Assistant,
    pub config: AppConfig,
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: health check plus the v1 API.
///
/// Layers applied:
/// - CORS (any origin, GET/POST, JSON content type)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api::v1_router(state))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// The API key is validated before the listener binds — a missing
/// credential is fatal here and nowhere later.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.ensure_api_key()?;

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = sonjutalk_providers::build_from_config(&config);
    let assistant = Assistant::new(provider, &config);

    let state = Arc::new(GatewayState { assistant, config });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
