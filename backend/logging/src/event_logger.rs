//! Analysis Event Logger
//!
//! One structured event per analysis phase, routed through `tracing` under
//! the `analysis_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    Started {
        filename: String,
        size_bytes: usize,
    },
    Completed {
        filename: String,
        markdown_chars: usize,
        elapsed_ms: u64,
    },
    Failed {
        filename: String,
        error_msg: String,
        elapsed_ms: u64,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub analysis_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

pub struct AnalysisEventLogger;

impl AnalysisEventLogger {
    /// Redact and emit an analysis event. Returns the entry that was logged.
    pub fn log_event(analysis_id: &str, mut event: AnalysisEvent) -> EventLogEntry {
        if let AnalysisEvent::Failed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }

        let entry = EventLogEntry {
            analysis_id: analysis_id.into(),
            timestamp: Utc::now(),
            event,
        };

        match &entry.event {
            AnalysisEvent::Failed { .. } => {
                warn!(target: "analysis_events", event = ?entry, "Analysis event")
            }
            _ => info!(target: "analysis_events", event = ?entry, "Analysis event"),
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_are_redacted() {
        let key = "f".repeat(64);
        let entry = AnalysisEventLogger::log_event(
            "a-1",
            AnalysisEvent::Failed {
                filename: "page.png".into(),
                error_msg: format!("rejected {key}"),
                elapsed_ms: 3,
            },
        );
        match entry.event {
            AnalysisEvent::Failed { error_msg, .. } => assert!(!error_msg.contains(&key)),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn events_are_tagged_by_type() {
        let entry = EventLogEntry {
            analysis_id: "a-2".into(),
            timestamp: Utc::now(),
            event: AnalysisEvent::Started {
                filename: "page.png".into(),
                size_bytes: 10,
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "started");
        assert_eq!(json["event"]["filename"], "page.png");
        assert_eq!(json["analysis_id"], "a-2");
    }
}
