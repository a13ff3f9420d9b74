//! HTTP API gateway for Crabdesk.
//!
//! Thin transport collaborator over the orchestrator: `POST /api/chat` for
//! conversation turns and `GET /api/health` for the offline-mode status.
//! The gateway catches orchestrator errors and degrades to a static apology
//! reply — the process never crashes on a chat request.
//!
//! Built on Axum.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crabdesk_core::ChatRequest;
use crabdesk_orchestrator::Orchestrator;

/// Static reply used when the orchestrator fails unexpectedly.
const APOLOGY_REPLY: &str = "Something glitched on my end while pulling in support notes. \
                             Let's give that another shot in a moment.";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
    pub offline_only: bool,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // 2 MB body limit
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: &crabdesk_config::AppConfig,
    orchestrator: Arc<Orchestrator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(GatewayState {
        orchestrator,
        offline_only: config.offline_only,
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting in offline knowledge mode");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    offline_only: bool,
    version: &'static str,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        offline_only: state.offline_only,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let requested_session = payload.session_id.clone();

    match state
        .orchestrator
        .handle_message(payload.session_id.as_deref(), &payload.message)
        .await
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => {
            error!(error = %e, "Chat handling failed");
            let degraded = serde_json::json!({
                "sessionId": requested_session,
                "reply": APOLOGY_REPLY,
                "metadata": { "usedModels": [] },
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(degraded)).into_response()
        }
    }
}
