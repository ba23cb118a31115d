//! Chat-completion chunk parsing for Server-Sent Events payloads.
//!
//! Framing is handled by `eventsource-stream`; this module only turns one
//! `data:` payload into a text fragment.

use anyhow::{bail, Result};
use serde::Deserialize;

use markscan_core::ScanError;

/// Payload that ends an OpenAI-compatible stream.
pub const DONE_MARKER: &str = "[DONE]";

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the text delta from one `data:` payload.
///
/// A chunk without a delta yields an empty fragment. Payloads that are not
/// chunk JSON, and in-stream error objects, fail the stream.
pub fn parse_fragment(payload: &str) -> Result<String> {
    let chunk: StreamChunk = serde_json::from_str(payload).map_err(|e| {
        ScanError::Stream(format!("malformed completion chunk ({e}): {}", preview(payload)))
    })?;

    if let Some(error) = chunk.error {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        bail!("stream returned an error: {message}");
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .unwrap_or_default())
}

fn preview(payload: &str) -> String {
    const MAX: usize = 80;
    match payload.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &payload[..cut]),
        None => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_from_delta_content() {
        let payload = r##"{"choices":[{"index":0,"delta":{"content":"# Title\n"}}]}"##;
        assert_eq!(parse_fragment(payload).unwrap(), "# Title\n");
    }

    #[test]
    fn chunk_without_delta_is_empty_fragment() {
        let role_only = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_fragment(role_only).unwrap(), "");
        let usage_only = r#"{"choices":[],"usage":{"total_tokens":12}}"#;
        assert_eq!(parse_fragment(usage_only).unwrap(), "");
    }

    #[test]
    fn malformed_payload_fails() {
        let err = parse_fragment("{truncated garbage").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::Stream(msg)) if msg.contains("{truncated garbage")
        ));
    }

    #[test]
    fn long_malformed_payload_is_shortened() {
        let junk = "x".repeat(500);
        let message = parse_fragment(&junk).unwrap_err().to_string();
        assert!(message.len() < 300, "{message}");
        assert!(message.ends_with("..."), "{message}");
    }

    #[test]
    fn error_object_fails() {
        let err = parse_fragment(r#"{"error":{"message":"quota exceeded"}}"#).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
