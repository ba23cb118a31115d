//! Transient on-disk staging of uploaded images.
//!
//! An upload is written to `temp_<filename>` in the staging directory and the
//! returned guard removes it when dropped, on success and failure alike.
//! Names held by a live analysis are tracked in memory, so only a real
//! concurrent clash is refused; a file left behind by a killed process is
//! simply overwritten.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use markscan_core::{ScanError, Upload};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Prefix of every staged file name.
pub const STAGING_PREFIX: &str = "temp_";

type InFlight = Arc<Mutex<HashSet<PathBuf>>>;

/// A staging directory plus the set of paths currently owned by analyses.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
    in_flight: InFlight,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            in_flight: Arc::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the upload to `dir/temp_<basename>`.
    ///
    /// Fails with [`ScanError::StagingConflict`] while another analysis in
    /// this process holds the same name, and leaves its file alone.
    pub async fn stage(&self, upload: &Upload) -> Result<StagedImage, ScanError> {
        let path = staging_path(&self.dir, &upload.filename);
        let staged = self.claim(path)?;

        if tokio::fs::try_exists(&staged.path).await.unwrap_or(false) {
            warn!(path = %staged.path.display(), "Overwriting leftover staged file");
        }

        // The guard owns the path from here, so a failed write still cleans up.
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&staged.path)
            .await
            .map_err(ScanError::Staging)?;
        file.write_all(&upload.data).await.map_err(ScanError::Staging)?;
        file.flush().await.map_err(ScanError::Staging)?;

        debug!(path = %staged.path.display(), bytes = upload.len(), "Staged upload");
        Ok(staged)
    }

    /// Paths currently held by live guards.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn claim(&self, path: PathBuf) -> Result<StagedImage, ScanError> {
        let mut held = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !held.insert(path.clone()) {
            return Err(ScanError::StagingConflict(path.display().to_string()));
        }
        Ok(StagedImage {
            path,
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}

/// Owns one staged file for the duration of an analysis.
#[derive(Debug)]
pub struct StagedImage {
    path: PathBuf,
    in_flight: InFlight,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed staged upload"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload"),
        }
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.path);
    }
}

/// Deterministic staging location for an upload's declared filename.
///
/// Directory components are stripped so a crafted name cannot escape `dir`.
pub fn staging_path(dir: &Path, filename: &str) -> PathBuf {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|b| !b.is_empty() && *b != "." && *b != "..")
        .unwrap_or("upload");
    dir.join(format!("{STAGING_PREFIX}{base}"))
}
