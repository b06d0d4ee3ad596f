// crates/bowtie-report-core/src/runtime/parser.rs
// ============================================================================
// Module: Record Parser
// Description: Per-record decoder for line-oriented run streams.
// Purpose: Turn untrusted JSON lines into typed run events.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The parser decodes one record at a time. A record's meaning depends only
//! on its own content; the [`RecordParser`] tracks nothing beyond positions
//! and counters. Record kind is chosen from the keys present, checked in a
//! fixed order: `implementations`, `case`, `implementation`, `did_fail_fast`.
//!
//! Security posture: records are untrusted input. Oversized records are
//! rejected before JSON decoding, and decode failures never abort the stream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::CaseError;
use crate::core::CaseResultRecord;
use crate::core::ImplementationId;
use crate::core::PositionedEvent;
use crate::core::RecordKind;
use crate::core::RecordPosition;
use crate::core::RecordedOutcome;
use crate::core::RunEvent;
use crate::core::TestOutcome;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum size of a single record in bytes.
pub const DEFAULT_MAX_RECORD_BYTES: usize = 16 * 1024 * 1024;

/// Size limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    /// Maximum size of a single record in bytes.
    pub max_record_bytes: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A record that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed record at {position}: {reason}")]
pub struct MalformedRecord {
    /// Position of the offending record.
    pub position: RecordPosition,
    /// Why decoding failed.
    pub reason: MalformedReason,
}

/// Classification of decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// Record exceeds the configured size limit.
    #[error("record exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Record size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Record is not valid JSON.
    #[error("invalid json: {0}")]
    InvalidJson(String),
    /// Record is valid JSON but not an object.
    #[error("record is not a json object")]
    NotAnObject,
    /// Object carries none of the recognised kind keys.
    #[error("record kind not recognized")]
    UnknownKind,
    /// Object has a recognised kind but an invalid shape.
    #[error("invalid {kind} record: {message}")]
    InvalidShape {
        /// Kind the record was classified as.
        kind: RecordKind,
        /// Decoder diagnostic.
        message: String,
    },
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Streaming front end over [`decode_record`].
///
/// # Invariants
/// - Positions are 1-based and advance once per fed line, blank lines included.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    /// Limits applied to each record.
    limits: ParserLimits,
    /// Number of lines fed so far.
    lines: u64,
    /// Non-blank records seen so far.
    records: u64,
    /// Records rejected as malformed.
    malformed: u64,
}

impl RecordParser {
    /// Creates a parser with the given limits.
    #[must_use]
    pub const fn new(limits: ParserLimits) -> Self {
        Self {
            limits,
            lines: 0,
            records: 0,
            malformed: 0,
        }
    }

    /// Decodes the next line of the stream.
    ///
    /// Returns `Ok(None)` for blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecord`] when the line cannot be decoded. The parser
    /// remains usable for subsequent lines.
    pub fn feed(&mut self, line: &str) -> Result<Option<PositionedEvent>, MalformedRecord> {
        self.lines = self.lines.saturating_add(1);
        let position = RecordPosition::new(self.lines);
        match decode_record(position, line, self.limits) {
            Ok(Some(event)) => {
                self.records = self.records.saturating_add(1);
                Ok(Some(PositionedEvent {
                    position,
                    event,
                }))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                self.records = self.records.saturating_add(1);
                self.malformed = self.malformed.saturating_add(1);
                Err(err)
            }
        }
    }

    /// Returns the number of non-blank records seen.
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Returns the number of malformed records seen.
    #[must_use]
    pub const fn malformed(&self) -> u64 {
        self.malformed
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes one record.
///
/// Returns `Ok(None)` when the line is blank.
///
/// # Errors
///
/// Returns [`MalformedRecord`] when the record is oversized, not JSON, not an
/// object, of no recognised kind, or of a recognised kind with a bad shape.
pub fn decode_record(
    position: RecordPosition,
    line: &str,
    limits: ParserLimits,
) -> Result<Option<RunEvent>, MalformedRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let malformed = |reason| MalformedRecord {
        position,
        reason,
    };
    if line.len() > limits.max_record_bytes {
        return Err(malformed(MalformedReason::TooLarge {
            size: line.len(),
            limit: limits.max_record_bytes,
        }));
    }
    let value: Value = serde_json::from_str(trimmed)
        .map_err(|err| malformed(MalformedReason::InvalidJson(err.to_string())))?;
    let Value::Object(object) = value else {
        return Err(malformed(MalformedReason::NotAnObject));
    };
    decode_object(object).map(Some).map_err(malformed)
}

/// Classifies an object by its keys and decodes it.
fn decode_object(object: Map<String, Value>) -> Result<RunEvent, MalformedReason> {
    if object.contains_key("implementations") {
        return decode_typed(RecordKind::RunStarted, object).map(RunEvent::RunStarted);
    }
    if object.contains_key("case") {
        return decode_typed(RecordKind::CaseDefined, object).map(RunEvent::CaseDefined);
    }
    if object.contains_key("implementation") {
        return decode_case_result(&object).map(RunEvent::CaseResultRecorded);
    }
    if object.contains_key("did_fail_fast") {
        return decode_typed(RecordKind::RunCompleted, object).map(RunEvent::RunCompleted);
    }
    Err(MalformedReason::UnknownKind)
}

/// Decodes a record whose shape maps directly onto a serde type.
fn decode_typed<T: DeserializeOwned>(
    kind: RecordKind,
    object: Map<String, Value>,
) -> Result<T, MalformedReason> {
    serde_json::from_value(Value::Object(object)).map_err(|err| shape(kind, err.to_string()))
}

/// Decodes a result record into one of its three body forms.
fn decode_case_result(object: &Map<String, Value>) -> Result<CaseResultRecord, MalformedReason> {
    let kind = RecordKind::CaseResultRecorded;
    let implementation = match object.get("implementation") {
        Some(Value::String(id)) => ImplementationId::new(id.clone()),
        _ => return Err(shape(kind, "implementation must be a string")),
    };
    let seq = object
        .get("seq")
        .and_then(Value::as_u64)
        .ok_or_else(|| shape(kind, "seq must be a non-negative integer"))?;

    let outcome = if let Some(results) = object.get("results") {
        let Value::Array(entries) = results else {
            return Err(shape(kind, "results must be an array"));
        };
        let outcomes = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| decode_test_outcome(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        let expected = match object.get("expected") {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(values.iter().map(Value::as_bool).collect()),
            Some(_) => return Err(shape(kind, "expected must be an array")),
        };
        RecordedOutcome::Tests {
            outcomes,
            expected,
        }
    } else if object.get("skipped").and_then(Value::as_bool) == Some(true) {
        RecordedOutcome::CaseSkipped {
            message: string_field(object, "message"),
        }
    } else if object.contains_key("context") || object.contains_key("caught") {
        let context = object.get("context").cloned();
        RecordedOutcome::CaseErrored(CaseError {
            caught: object.get("caught").and_then(Value::as_bool).unwrap_or(false),
            message: context.as_ref().and_then(context_message),
            context,
        })
    } else {
        return Err(shape(kind, "expected results, skipped, or an error context"));
    };

    Ok(CaseResultRecord {
        implementation,
        seq,
        outcome,
    })
}

/// Decodes one positional entry of a `results` array.
fn decode_test_outcome(index: usize, entry: &Value) -> Result<TestOutcome, MalformedReason> {
    let kind = RecordKind::CaseResultRecorded;
    let Value::Object(fields) = entry else {
        return Err(shape(kind, format!("result {index} must be an object")));
    };
    if let Some(valid) = fields.get("valid") {
        let Some(valid) = valid.as_bool() else {
            return Err(shape(kind, format!("result {index} has a non-boolean verdict")));
        };
        return Ok(TestOutcome::Verdict {
            valid,
        });
    }
    if fields.get("skipped").and_then(Value::as_bool) == Some(true) {
        return Ok(TestOutcome::Skipped {
            message: string_field(fields, "message"),
        });
    }
    if fields.get("errored").and_then(Value::as_bool) == Some(true) {
        return Ok(TestOutcome::Errored {
            message: fields.get("context").and_then(context_message),
        });
    }
    Err(shape(kind, format!("result {index} has no recognised outcome")))
}

/// Extracts a human-readable message from an error context.
fn context_message(context: &Value) -> Option<String> {
    match context {
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => ["message", "stderr", "traceback"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

/// Returns a string field when present.
fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Builds an invalid-shape reason.
fn shape(kind: RecordKind, message: impl Into<String>) -> MalformedReason {
    MalformedReason::InvalidShape {
        kind,
        message: message.into(),
    }
}
