use thiserror::Error;

/// Named failure causes for one analysis.
///
/// Callers at the UI boundary collapse all of these into a single message;
/// the variants exist so logs and tests can tell them apart.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no API key was provided")]
    MissingCredential,

    #[error("the uploaded file is empty")]
    EmptyUpload,

    #[error("upload is {size} bytes, the limit is {limit} bytes")]
    UploadTooLarge { size: usize, limit: usize },

    #[error("unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("staging file already exists: {0}")]
    StagingConflict(String),

    #[error("staging failed: {0}")]
    Staging(#[source] std::io::Error),

    #[error("vision provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("response stream failed: {0}")]
    Stream(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_mentions_provider_and_message() {
        let err = ScanError::Provider {
            provider: "together".into(),
            message: "401 Unauthorized".into(),
        };
        assert_eq!(
            err.to_string(),
            "vision provider error (together): 401 Unauthorized"
        );
    }

    #[test]
    fn too_large_reports_both_sizes() {
        let err = ScanError::UploadTooLarge { size: 30, limit: 20 };
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("20"));
    }
}
