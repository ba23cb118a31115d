/// Vision request encoding: one staged image becomes one multimodal message.
use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use markscan_core::{VisionRequest, MARKDOWN_PROMPT};
use media::resolve_image_mime;

/// Standard, padded base64 of the raw image bytes.
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// `data:<mime>;base64,<payload>`
pub fn data_uri(mime: &str, payload: &str) -> String {
    format!("data:{mime};base64,{payload}")
}

/// Read a staged image and build the streamed Markdown-transcription request.
///
/// The whole file is embedded in the single message; callers bound its size
/// before staging.
pub async fn build_request(model: &str, path: &Path) -> Result<VisionRequest> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read staged image {}", path.display()))?;
    let mime = resolve_image_mime(path, &bytes);

    debug!(mime = %mime, bytes = bytes.len(), model, "Encoding image request");

    Ok(VisionRequest::new(
        model,
        MARKDOWN_PROMPT,
        data_uri(&mime, &encode_image(&bytes)),
    ))
}
