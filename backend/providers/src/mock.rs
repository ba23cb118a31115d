use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::stream;

use markscan_core::{Credential, FragmentStream, ScanError, VisionProvider, VisionRequest};

/// A mock vision provider that replays scripted fragments.
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    script: Vec<Result<String, String>>,
    rejection: Option<String>,
    requests: Arc<Mutex<Vec<VisionRequest>>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Vec::new(),
            rejection: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fragments to stream, in order.
    pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script.extend(fragments.into_iter().map(|f| Ok(f.into())));
        self
    }

    /// Fail the stream after the fragments scripted so far.
    pub fn with_stream_error(mut self, message: impl Into<String>) -> Self {
        self.script.push(Err(message.into()));
        self
    }

    /// Reject every call before any streaming starts, like a bad API key.
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.rejection = Some(message.into());
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<VisionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_completion(
        &self,
        _credential: &Credential,
        request: &VisionRequest,
    ) -> Result<FragmentStream> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        if let Some(message) = &self.rejection {
            return Err(ScanError::Provider {
                provider: self.name.clone(),
                message: message.clone(),
            }
            .into());
        }

        let items: Vec<Result<String>> = self
            .script
            .iter()
            .map(|item| item.clone().map_err(|e| anyhow!(ScanError::Stream(e))))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }
}
