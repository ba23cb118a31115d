//! CLI Scan Command
//!
//! Runs one analysis from the terminal: the same session rules and outcome
//! messages as the web page, with the Markdown printed to stdout or a file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;

use markscan_core::{AnalysisOutcome, ScanError, Session, Upload};
use markscan_understanding::OcrService;

use crate::terminal_output::{heading, note_error, note_info, note_success, note_warn, write_markdown};

pub struct ScanArgs {
    pub image: PathBuf,
    pub api_key: Option<String>,
    pub output: Option<PathBuf>,
}

pub async fn run(ocr: &OcrService, args: ScanArgs) -> Result<ExitCode> {
    let upload = load_upload(&args.image).await?;
    let session = session_for(args.api_key, upload);

    if session.ready().is_none() {
        note_warn("Enter your Together AI API key (--api-key or TOGETHER_API_KEY) and upload a non-empty image.");
        return Ok(ExitCode::from(2));
    }

    note_info("Processing the image...");
    match ocr.run(&session).await {
        AnalysisOutcome::Success { markdown } => {
            note_success("Analysis completed!");
            match &args.output {
                Some(path) => {
                    tokio::fs::write(path, &markdown)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    note_info(&format!("Markdown written to {}", path.display()));
                }
                None => {
                    eprintln!("{}", heading("OCR Result in Markdown:"));
                    write_markdown(&mut std::io::stdout().lock(), &markdown)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        AnalysisOutcome::Failure { error } => {
            note_error(&error);
            Ok(ExitCode::FAILURE)
        }
        AnalysisOutcome::NotReady => Ok(ExitCode::from(2)),
    }
}

/// Read an image file into an [`Upload`], applying the picker's extension rule.
async fn load_upload(path: &Path) -> Result<Upload> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file path", path.display()))?;

    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let upload = Upload::new(filename, data);

    if !upload.has_allowed_extension() {
        return Err(ScanError::UnsupportedExtension(upload.filename).into());
    }
    debug!(filename = %upload.filename, size_bytes = upload.len(), "Loaded image");
    Ok(upload)
}

fn session_for(api_key: Option<String>, upload: Upload) -> Session {
    let mut session = Session::new();
    if let Some(key) = api_key {
        session.set_credential(key);
    }
    session.set_upload(upload);
    session
}
