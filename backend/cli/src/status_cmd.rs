//! CLI Status Command
//!
//! Queries `/api/health` of a running gateway.

use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::terminal_output::{note_success, note_warn};

#[derive(Debug, Deserialize)]
struct HealthReport {
    version: String,
    provider: String,
    model: String,
    max_upload_bytes: usize,
    uptime_seconds: u64,
}

pub async fn run(port: u16) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let response = match client
        .get(format!("http://localhost:{port}/api/health"))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(_) => {
            note_warn(&format!("MarkScan is not running on port {port}"));
            return Ok(());
        }
    };

    let report: HealthReport = response.error_for_status()?.json().await?;
    note_success(&format!("MarkScan {} is running on port {port}", report.version));
    println!("  provider:    {}", report.provider);
    println!("  model:       {}", report.model);
    println!("  max upload:  {} bytes", report.max_upload_bytes);
    println!("  uptime:      {}s", report.uptime_seconds);
    Ok(())
}
