use std::time::Instant;

use anyhow::{Context, Result};
use async_stream::try_stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use tracing::debug;

use markscan_core::{Credential, FragmentStream, ScanError, VisionProvider, VisionRequest};

use crate::sse::{parse_fragment, DONE_MARKER};

/// Together AI vision provider (OpenAI-compatible chat completions).
pub struct TogetherProvider {
    client: Client,
    base_url: String,
}

impl TogetherProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://api.together.xyz/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for TogetherProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionProvider for TogetherProvider {
    fn name(&self) -> &str {
        "together"
    }

    async fn stream_completion(
        &self,
        credential: &Credential,
        request: &VisionRequest,
    ) -> Result<FragmentStream> {
        let start = Instant::now();

        debug!(model = %request.model, "Sending request to Together");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential.expose())
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await
            .context("Together HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ScanError::Provider {
                provider: "together".to_string(),
                message: format!("{status}: {error_body}"),
            }
            .into());
        }

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "Together stream opened"
        );

        let mut events = response.bytes_stream().eventsource();
        let stream = try_stream! {
            let mut chunks = 0usize;

            while let Some(event) = events.next().await {
                let event = event.map_err(|e| anyhow::Error::from(ScanError::Stream(e.to_string())))?;
                if event.data == DONE_MARKER {
                    break;
                }
                chunks += 1;
                yield parse_fragment(&event.data)?;
            }

            // A 200 body with no events is not a completion (proxy error pages, wrong endpoint).
            if chunks == 0 {
                Err::<(), _>(anyhow::Error::from(ScanError::Stream(
                    "response carried no completion events".to_string(),
                )))?;
            }
        };

        Ok(Box::pin(stream))
    }
}
