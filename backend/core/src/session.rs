//! Session context: the credential and upload a user has supplied so far.
//!
//! Both UIs (web page, terminal) fill a [`Session`] and hand it to the
//! orchestration layer instead of relying on ambient state.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::types::ALLOWED_EXTENSIONS;

/// API key for the remote model endpoint. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Returns `None` when the key is blank.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// An uploaded image as received from the user.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Lowercased extension of the declared filename, without the dot.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Whether the declared filename has one of [`ALLOWED_EXTENSIONS`].
    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Per-user state for one UI session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Option<Credential>,
    upload: Option<Upload>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, key: impl Into<String>) -> Self {
        self.set_credential(key);
        self
    }

    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Replace the credential; a blank key clears it.
    pub fn set_credential(&mut self, key: impl Into<String>) {
        self.credential = Credential::new(key);
    }

    pub fn set_upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
    }

    /// Both inputs, when an analysis may be attempted.
    pub fn ready(&self) -> Option<(&Credential, &Upload)> {
        match (&self.credential, &self.upload) {
            (Some(credential), Some(upload)) if !upload.is_empty() => Some((credential, upload)),
            _ => None,
        }
    }
}

/// What the presentation layer shows after the user triggers an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// Credential or upload missing; nothing was attempted.
    NotReady,
    Success { markdown: String },
    Failure { error: String },
}
