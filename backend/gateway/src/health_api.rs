//! Gateway Health API

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub max_upload_bytes: usize,
    pub uptime_seconds: u64,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "markscan",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.ocr.provider_name().to_string(),
        model: state.ocr.config().model.clone(),
        max_upload_bytes: state.max_upload_bytes(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use markscan_providers::MockProvider;
    use markscan_understanding::OcrService;
    use tower::ServiceExt;

    use crate::server::{build_router, GatewayState};

    #[tokio::test]
    async fn reports_provider_and_model() {
        let ocr = OcrService::new(Arc::new(MockProvider::new("mock")));
        let app = build_router(GatewayState::new(ocr));

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "mock");
        assert_eq!(json["model"], markscan_core::DEFAULT_MODEL);
    }
}
