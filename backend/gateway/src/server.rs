//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use markscan_understanding::OcrService;

use crate::attachments;
use crate::control_ui;
use crate::health_api;

/// Room for multipart framing and the credential field on top of the image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub ocr: Arc<OcrService>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(ocr: OcrService) -> Self {
        Self {
            ocr: Arc::new(ocr),
            started_at: Instant::now(),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.ocr.config().max_upload_bytes
    }
}

/// Build the router: UI page, analysis API, health.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_upload_bytes().saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/api/analyze", post(attachments::analyze_upload))
        .route("/api/health", get(health_api::get_health))
        .merge(control_ui::ui_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Starts the main Axum HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
