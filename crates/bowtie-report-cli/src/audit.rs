// crates/bowtie-report-cli/src/audit.rs
// ============================================================================
// Module: Ingest Audit Logging
// Description: Structured audit events for report ingestion.
// Purpose: Emit JSON-lines ingest events without hard dependencies.
// Dependencies: bowtie-report-config, bowtie-report-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every ingest emits `ingest_started`, one `record_malformed` per skipped
//! record, and then either `ingest_completed` or `ingest_failed`. Events are
//! serialized as single JSON lines and routed through an [`AuditSink`]
//! chosen from the `[audit]` configuration section.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use bowtie_report_config::AuditConfig;
use bowtie_report_core::BuildError;
use bowtie_report_core::IngestOutcome;
use bowtie_report_core::MalformedRecord;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ingest audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Input label (`-` for stdin).
    pub source: String,
    /// Event-specific fields.
    #[serde(flatten)]
    pub detail: AuditDetail,
}

/// Event-specific audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AuditDetail {
    /// Ingest began.
    Started {
        /// Command that requested the ingest.
        command: &'static str,
        /// Input size in bytes.
        input_bytes: usize,
    },
    /// A record was skipped.
    Malformed {
        /// 1-based line number.
        line: u64,
        /// Decode failure description.
        reason: String,
    },
    /// Ingest produced a report.
    Completed {
        /// Non-blank records seen.
        records: u64,
        /// Records skipped as malformed.
        malformed: usize,
        /// Declared cases.
        cases: usize,
        /// Declared implementations.
        implementations: usize,
        /// Whether the completion marker was seen.
        complete: bool,
        /// Whether the run stopped early.
        did_fail_fast: Option<bool>,
    },
    /// Ingest aborted on a structural violation.
    Failed {
        /// 1-based line number.
        line: u64,
        /// Case sequence number when the error names one.
        seq: Option<u64>,
        /// Implementation when the error names one.
        implementation: Option<String>,
        /// Error description.
        error: String,
    },
}

impl AuditEvent {
    /// Builds an `ingest_started` event.
    #[must_use]
    pub fn ingest_started(source: &str, command: &'static str, input_bytes: usize) -> Self {
        Self::new(
            "ingest_started",
            source,
            AuditDetail::Started {
                command,
                input_bytes,
            },
        )
    }

    /// Builds a `record_malformed` event.
    #[must_use]
    pub fn record_malformed(source: &str, record: &MalformedRecord) -> Self {
        Self::new(
            "record_malformed",
            source,
            AuditDetail::Malformed {
                line: record.position.line(),
                reason: record.reason.to_string(),
            },
        )
    }

    /// Builds an `ingest_completed` event.
    #[must_use]
    pub fn ingest_completed(source: &str, outcome: &IngestOutcome) -> Self {
        let report = &outcome.report;
        Self::new(
            "ingest_completed",
            source,
            AuditDetail::Completed {
                records: outcome.records,
                malformed: outcome.malformed_count(),
                cases: report.cases().len(),
                implementations: report.implementations().len(),
                complete: report.is_complete(),
                did_fail_fast: report.completion().map(|completion| completion.did_fail_fast),
            },
        )
    }

    /// Builds an `ingest_failed` event.
    #[must_use]
    pub fn ingest_failed(source: &str, error: &BuildError) -> Self {
        Self::new(
            "ingest_failed",
            source,
            AuditDetail::Failed {
                line: error.position().line(),
                seq: error.seq(),
                implementation: error.implementation().map(ToString::to_string),
                error: error.to_string(),
            },
        )
    }

    /// Stamps a new event with the current time.
    fn new(event: &'static str, source: &str, detail: AuditDetail) -> Self {
        Self {
            event,
            timestamp_ms: now_ms(),
            source: source.to_string(),
            detail,
        }
    }
}

/// Returns milliseconds since the Unix epoch, or zero before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis())
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for ingest events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &AuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Builds the sink described by the audit configuration.
///
/// # Errors
///
/// Returns an error when the configured log file cannot be opened.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Box<dyn AuditSink>> {
    if !config.enabled {
        return Ok(Box::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => Ok(Box::new(FileAuditSink::new(path)?)),
        None => Ok(Box::new(StderrAuditSink)),
    }
}
