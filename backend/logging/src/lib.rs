//! Structured logging for markscan.
//!
//! Console plus rolling NDJSON file output, credential redaction, and one
//! structured event per analysis.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, AnalysisEventLogger, EventLogEntry};
pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::{redact_secret, redact_sensitive_data};
