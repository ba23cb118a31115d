use std::pin::Pin;

use anyhow::Result;
use async_trait::async_trait;
use futures::Stream;

use crate::session::Credential;
use crate::types::VisionRequest;

/// Incremental text fragments of one model response.
///
/// Finite and not restartable: it ends when the remote stream ends.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Trait for remote vision-language model endpoints.
///
/// The one capability the orchestration needs: submit a multimodal prompt,
/// receive a sequence of text fragments.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "together", "mock").
    fn name(&self) -> &str;

    /// Submit the request with the given credential and return the response stream.
    async fn stream_completion(
        &self,
        credential: &Credential,
        request: &VisionRequest,
    ) -> Result<FragmentStream>;
}
