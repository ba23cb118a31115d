//! Image upload endpoint.
//!
//! `POST /api/analyze` takes a multipart form with an `api_key` text field and
//! a `file` part, fills a [`Session`], and runs one analysis.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use markscan_core::{AnalysisOutcome, ScanError, Session, Upload};

use crate::server::GatewayState;

/// Handler for `POST /api/analyze`.
pub async fn analyze_upload(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> (StatusCode, Json<AnalysisOutcome>) {
    let session = match read_session(multipart).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Rejected malformed upload");
            return failure(e.status(), e.body_text());
        }
    };

    let Some((_, upload)) = session.ready() else {
        info!("Analysis not attempted: credential or image missing");
        return (StatusCode::BAD_REQUEST, Json(AnalysisOutcome::NotReady));
    };

    if !upload.has_allowed_extension() {
        let err = ScanError::UnsupportedExtension(upload.filename.clone());
        return failure(StatusCode::UNPROCESSABLE_ENTITY, err.to_string());
    }
    if upload.len() > state.max_upload_bytes() {
        let err = ScanError::UploadTooLarge {
            size: upload.len(),
            limit: state.max_upload_bytes(),
        };
        return failure(StatusCode::PAYLOAD_TOO_LARGE, err.to_string());
    }

    info!(filename = %upload.filename, size_bytes = upload.len(), "Received image upload");

    let outcome = state.ocr.run(&session).await;
    let status = match &outcome {
        AnalysisOutcome::Success { .. } => StatusCode::OK,
        AnalysisOutcome::NotReady => StatusCode::BAD_REQUEST,
        AnalysisOutcome::Failure { .. } => StatusCode::BAD_GATEWAY,
    };
    (status, Json(outcome))
}

async fn read_session(mut multipart: Multipart) -> Result<Session, MultipartError> {
    let mut session = Session::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("api_key") => session.set_credential(field.text().await?),
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await?;
                session.set_upload(Upload::new(filename, data));
            }
            _ => {}
        }
    }

    Ok(session)
}

fn failure(status: StatusCode, error: String) -> (StatusCode, Json<AnalysisOutcome>) {
    (
        status,
        Json(AnalysisOutcome::Failure {
            error: format!("Error processing the image: {error}"),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
        Router,
    };
    use http_body_util::BodyExt;
    use markscan_providers::MockProvider;
    use markscan_understanding::{OcrConfig, OcrService};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::server::build_router;

    const BOUNDARY: &str = "markscan-test-boundary";
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn app(provider: MockProvider, dir: &Path, max_upload_bytes: usize) -> Router {
        let ocr = OcrService::new(Arc::new(provider)).with_config(OcrConfig {
            staging_dir: dir.to_path_buf(),
            max_upload_bytes,
            ..OcrConfig::default()
        });
        build_router(GatewayState::new(ocr))
    }

    fn form(api_key: Option<&str>, file: Option<(&str, &[u8])>) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(key) = api_key {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"api_key\"\r\n\r\n{key}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn analyzes_upload_and_returns_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new("mock").with_fragments(["# Title\n", "", "Some text."]);
        let app = app(provider, dir.path(), 1024);

        let (status, json) = send(app, form(Some("key"), Some(("page.png", PNG)))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["markdown"], "# Title\nSome text.");
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn missing_key_is_not_attempted() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new("mock").with_fragments(["never"]);
        let app = app(provider.clone(), dir.path(), 1024);

        let (status, json) = send(app, form(None, Some(("page.png", PNG)))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "not_ready");
        assert!(provider.requests().is_empty());
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn empty_file_is_not_attempted() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new("mock");
        let app = app(provider.clone(), dir.path(), 1024);

        let (status, json) = send(app, form(Some("key"), Some(("page.png", &b""[..])))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "not_ready");
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new("mock");
        let app = app(provider.clone(), dir.path(), 1024);

        let (status, json) = send(app, form(Some("key"), Some(("notes.pdf", PNG)))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["status"], "failure");
        assert!(json["error"].as_str().unwrap().contains("notes.pdf"));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new("mock");
        let app = app(provider.clone(), dir.path(), 8);

        let (status, json) = send(app, form(Some("key"), Some(("page.png", PNG)))).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["status"], "failure");
        assert!(provider.requests().is_empty());
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new("mock").rejecting("401 Unauthorized");
        let app = app(provider, dir.path(), 1024);

        let (status, json) = send(app, form(Some("key"), Some(("page.png", PNG)))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["status"], "failure");
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("Error processing the image: "), "{error}");
        assert!(error.contains("401 Unauthorized"), "{error}");
        assert!(dir_is_empty(dir.path()));
    }
}
