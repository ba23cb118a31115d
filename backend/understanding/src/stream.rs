//! Streaming response accumulation.

use anyhow::Result;
use futures::StreamExt;
use tracing::debug;

use markscan_core::FragmentStream;

/// Drain a fragment stream into one string.
///
/// Fragments are appended in arrival order with no separator; empty ones
/// contribute nothing. The first error aborts and is returned as-is, with no
/// partial text.
pub async fn accumulate(mut stream: FragmentStream) -> Result<String> {
    let mut text = String::new();
    let mut fragments = 0usize;

    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        if !fragment.is_empty() {
            text.push_str(&fragment);
            fragments += 1;
        }
    }

    debug!(fragments, chars = text.chars().count(), "Response stream drained");
    Ok(text)
}
