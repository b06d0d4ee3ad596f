// crates/bowtie-report-core/src/core/records.rs
// ============================================================================
// Module: Run Records
// Description: Typed events decoded from a run-record stream.
// Purpose: Define the contract between the record parser and report builder.
// Dependencies: crate::core::{case, identifiers, implementation, results}, serde
// ============================================================================

//! ## Overview
//! A test run is a line-oriented stream of JSON records. Each well-formed
//! record decodes into exactly one [`RunEvent`]: run metadata, a case
//! definition, one implementation's results for one case, or the completion
//! marker. Events carry no cross-record references beyond case sequence
//! numbers and implementation identifiers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::case::CaseBody;
use crate::core::identifiers::ImplementationId;
use crate::core::identifiers::RecordPosition;
use crate::core::implementation::ImplementationMetadata;
use crate::core::results::CaseError;

// ============================================================================
// SECTION: Run Start
// ============================================================================

/// Run metadata declaring the implementations under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStart {
    /// Implementations keyed by identifier.
    pub implementations: BTreeMap<ImplementationId, ImplementationMetadata>,
    /// Meta-schema URI of the dialect the run targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    /// Version of the harness that produced the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bowtie_version: Option<String>,
    /// Start timestamp as reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    /// Free-form run metadata.
    #[serde(default)]
    pub metadata: Value,
}

// ============================================================================
// SECTION: Case Definition
// ============================================================================

/// Declaration of one case and its tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDefinition {
    /// Sequence number written by the producer, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    /// Case payload.
    pub case: CaseBody,
}

// ============================================================================
// SECTION: Case Results
// ============================================================================

/// Outcome of one test as written in a result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// Implementation produced a validity verdict.
    Verdict {
        /// Reported validity.
        valid: bool,
    },
    /// Implementation skipped the test.
    Skipped {
        /// Optional skip reason.
        message: Option<String>,
    },
    /// Implementation errored on the test.
    Errored {
        /// Optional diagnostic message.
        message: Option<String>,
    },
}

/// Body of a result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOutcome {
    /// One outcome per test, in test order.
    Tests {
        /// Positional outcomes.
        outcomes: Vec<TestOutcome>,
        /// Producer-side expectations, used for tests that declare none.
        expected: Option<Vec<Option<bool>>>,
    },
    /// The implementation could not run the case at all.
    CaseErrored(CaseError),
    /// The implementation skipped the whole case.
    CaseSkipped {
        /// Optional skip reason.
        message: Option<String>,
    },
}

/// One implementation's results for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResultRecord {
    /// Reporting implementation.
    pub implementation: ImplementationId,
    /// Sequence number as written in the case-definition record.
    pub seq: u64,
    /// Recorded outcome.
    pub outcome: RecordedOutcome,
}

// ============================================================================
// SECTION: Run Completion
// ============================================================================

/// Completion marker for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCompletion {
    /// Whether the run stopped early after a failure.
    pub did_fail_fast: bool,
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Typed event decoded from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Run metadata.
    RunStarted(RunStart),
    /// Case declaration.
    CaseDefined(CaseDefinition),
    /// Result record for one (implementation, case) pair.
    CaseResultRecorded(CaseResultRecord),
    /// Completion marker.
    RunCompleted(RunCompletion),
}

impl RunEvent {
    /// Returns the record kind of the event.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::RunStarted(_) => RecordKind::RunStarted,
            Self::CaseDefined(_) => RecordKind::CaseDefined,
            Self::CaseResultRecorded(_) => RecordKind::CaseResultRecorded,
            Self::RunCompleted(_) => RecordKind::RunCompleted,
        }
    }
}

/// Record kind classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Run-start record.
    RunStarted,
    /// Case-definition record.
    CaseDefined,
    /// Result record.
    CaseResultRecorded,
    /// Completion record.
    RunCompleted,
}

impl RecordKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunStarted => "run_started",
            Self::CaseDefined => "case_defined",
            Self::CaseResultRecorded => "case_result_recorded",
            Self::RunCompleted => "run_completed",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event paired with the position of its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedEvent {
    /// Record position.
    pub position: RecordPosition,
    /// Decoded event.
    pub event: RunEvent,
}
