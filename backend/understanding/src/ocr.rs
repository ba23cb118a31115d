//! Optical Character Recognition (OCR)
//!
//! Sends an uploaded image to a vision model and returns its Markdown
//! transcription. One call per user action: stage, encode, stream, clean up.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, instrument};
use uuid::Uuid;

use logging::{AnalysisEvent, AnalysisEventLogger, redact_secret};
use markscan_core::{
    AnalysisOutcome, Credential, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL, ScanError, Session,
    Upload, VisionProvider,
};
use media::StagingArea;

use crate::stream::accumulate;
use crate::vision::build_request;

/// Settings for [`OcrService`].
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Vision model requested from the provider.
    pub model: String,
    /// Directory receiving `temp_<filename>` while a request is in flight.
    pub staging_dir: PathBuf,
    /// Uploads above this size are rejected before staging.
    pub max_upload_bytes: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            staging_dir: PathBuf::from("."),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

pub struct OcrService {
    provider: Arc<dyn VisionProvider>,
    config: OcrConfig,
    staging: StagingArea,
}

impl OcrService {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        let config = OcrConfig::default();
        Self {
            provider,
            staging: StagingArea::new(&config.staging_dir),
            config,
        }
    }

    pub fn with_config(mut self, config: OcrConfig) -> Self {
        self.staging = StagingArea::new(&config.staging_dir);
        self.config = config;
        self
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Transcribe one upload to Markdown.
    ///
    /// The staged file is removed before this returns, whatever the outcome.
    #[instrument(skip_all, fields(filename = %upload.filename, provider = %self.provider.name()))]
    pub async fn analyze(&self, credential: &Credential, upload: &Upload) -> Result<String> {
        if upload.is_empty() {
            return Err(ScanError::EmptyUpload.into());
        }
        if upload.len() > self.config.max_upload_bytes {
            return Err(ScanError::UploadTooLarge {
                size: upload.len(),
                limit: self.config.max_upload_bytes,
            }
            .into());
        }

        let staged = self.staging.stage(upload).await?;
        let request = build_request(&self.config.model, staged.path()).await?;

        info!(model = %request.model, bytes = upload.len(), "Submitting image for transcription");
        let stream = self.provider.stream_completion(credential, &request).await?;
        let markdown = accumulate(stream).await?;

        drop(staged);
        Ok(markdown)
    }

    /// Run the analysis a session is ready for and fold every failure into
    /// one displayable message.
    pub async fn run(&self, session: &Session) -> AnalysisOutcome {
        let Some((credential, upload)) = session.ready() else {
            return AnalysisOutcome::NotReady;
        };

        let analysis_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        AnalysisEventLogger::log_event(
            &analysis_id,
            AnalysisEvent::Started {
                filename: upload.filename.clone(),
                size_bytes: upload.len(),
            },
        );

        match self.analyze(credential, upload).await {
            Ok(markdown) => {
                AnalysisEventLogger::log_event(
                    &analysis_id,
                    AnalysisEvent::Completed {
                        filename: upload.filename.clone(),
                        markdown_chars: markdown.chars().count(),
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    },
                );
                AnalysisOutcome::Success { markdown }
            }
            Err(e) => {
                let error = redact_secret(&format!("{e:#}"), credential.expose());
                AnalysisEventLogger::log_event(
                    &analysis_id,
                    AnalysisEvent::Failed {
                        filename: upload.filename.clone(),
                        error_msg: error.clone(),
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    },
                );
                AnalysisOutcome::Failure {
                    error: format!("Error processing the image: {error}"),
                }
            }
        }
    }
}
