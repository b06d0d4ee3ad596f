// crates/bowtie-report-core/src/runtime/ingest.rs
// ============================================================================
// Module: Ingestion
// Description: Drives the parser and builder over a whole record stream.
// Purpose: Separate recoverable decode failures from fatal build failures.
// Dependencies: crate::runtime::{builder, parser}
// ============================================================================

//! ## Overview
//! Ingestion feeds lines through a [`RecordParser`] and folds the decoded
//! events into a [`ReportBuilder`]. Malformed records are collected and
//! processing continues; the first structural violation aborts the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Report;
use crate::runtime::builder::BuildError;
use crate::runtime::builder::ReportBuilder;
use crate::runtime::parser::MalformedRecord;
use crate::runtime::parser::ParserLimits;
use crate::runtime::parser::RecordParser;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of ingesting one record stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// The built report.
    pub report: Report,
    /// Records skipped as malformed, in stream order.
    pub malformed: Vec<MalformedRecord>,
    /// Non-blank records seen, malformed ones included.
    pub records: u64,
}

impl IngestOutcome {
    /// Returns the number of skipped records.
    #[must_use]
    pub fn malformed_count(&self) -> usize {
        self.malformed.len()
    }

    /// Returns true when every record decoded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Ingests a sequence of lines in stream order.
///
/// # Errors
///
/// Returns [`BuildError`] on the first structural violation.
pub fn ingest_lines<'a, I>(lines: I, limits: ParserLimits) -> Result<IngestOutcome, BuildError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = RecordParser::new(limits);
    let mut builder = ReportBuilder::new();
    let mut malformed = Vec::new();
    for line in lines {
        match parser.feed(line) {
            Ok(Some(event)) => builder.apply(event)?,
            Ok(None) => {}
            Err(record) => malformed.push(record),
        }
    }
    Ok(IngestOutcome {
        report: builder.finish(),
        malformed,
        records: parser.records(),
    })
}

/// Ingests a complete newline-delimited stream held in memory.
///
/// # Errors
///
/// Returns [`BuildError`] on the first structural violation.
pub fn ingest_str(input: &str, limits: ParserLimits) -> Result<IngestOutcome, BuildError> {
    ingest_lines(input.lines(), limits)
}
