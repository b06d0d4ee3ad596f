// crates/bowtie-report-core/src/core/results.rs
// ============================================================================
// Module: Case Results
// Description: Per-test outcomes and per-implementation result mappings.
// Purpose: Represent what one implementation reported for each case.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! [`CaseResult`] is the outcome of one test for one implementation. Only the
//! verdict states (`successful` and `unsuccessful`) carry the validity the
//! implementation reported; whether that verdict matched the expectation is
//! encoded by which of the two states was chosen.
//!
//! [`ImplementationResults`] maps case sequence numbers to positional result
//! sequences. A missing entry means the implementation could not run the case
//! at all; every test of such a case reads as `errored`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::CaseSeq;

// ============================================================================
// SECTION: Case Result
// ============================================================================

/// Outcome of one test for one implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaseResult {
    /// Verdict matched the expected validity.
    Successful {
        /// Validity reported by the implementation.
        valid: bool,
    },
    /// Verdict contradicted the expected validity.
    Unsuccessful {
        /// Validity reported by the implementation.
        valid: bool,
    },
    /// Implementation raised an error for this test.
    Errored {
        /// Optional diagnostic message.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Implementation declined to run this test.
    Skipped {
        /// Optional skip reason.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl CaseResult {
    /// Classifies a reported verdict against an optional expectation.
    ///
    /// An unknown expectation cannot be contradicted and yields `Successful`.
    #[must_use]
    pub fn from_verdict(valid: bool, expected: Option<bool>) -> Self {
        match expected {
            Some(expected) if expected != valid => Self::Unsuccessful {
                valid,
            },
            _ => Self::Successful {
                valid,
            },
        }
    }

    /// Returns an errored result without a message.
    #[must_use]
    pub const fn errored() -> Self {
        Self::Errored {
            message: None,
        }
    }

    /// Returns the tag of this result.
    #[must_use]
    pub const fn state(&self) -> ResultState {
        match self {
            Self::Successful {
                ..
            } => ResultState::Successful,
            Self::Unsuccessful {
                ..
            } => ResultState::Unsuccessful,
            Self::Errored {
                ..
            } => ResultState::Errored,
            Self::Skipped {
                ..
            } => ResultState::Skipped,
        }
    }

    /// Returns the reported validity for verdict states.
    #[must_use]
    pub const fn valid(&self) -> Option<bool> {
        match self {
            Self::Successful {
                valid,
            }
            | Self::Unsuccessful {
                valid,
            } => Some(*valid),
            Self::Errored {
                ..
            }
            | Self::Skipped {
                ..
            } => None,
        }
    }

    /// Returns the three-state matrix outcome.
    #[must_use]
    pub const fn outcome(&self) -> CellOutcome {
        match self.state() {
            ResultState::Successful => CellOutcome::Correct,
            ResultState::Unsuccessful => CellOutcome::Incorrect,
            ResultState::Errored | ResultState::Skipped => CellOutcome::NoVerdict,
        }
    }
}

/// Tag of a [`CaseResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultState {
    /// Verdict matched the expectation.
    Successful,
    /// Verdict contradicted the expectation.
    Unsuccessful,
    /// Implementation errored.
    Errored,
    /// Implementation skipped the test.
    Skipped,
}

impl ResultState {
    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Successful => "successful",
            Self::Unsuccessful => "unsuccessful",
            Self::Errored => "errored",
            Self::Skipped => "skipped",
        }
    }
}

/// Three-state outcome used for matrix cells.
///
/// # Invariants
/// - Represents a closed set: correct, incorrect, or no verdict at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellOutcome {
    /// Implementation produced the expected verdict.
    Correct,
    /// Implementation produced the wrong verdict.
    Incorrect,
    /// Implementation produced no verdict (errored or skipped).
    NoVerdict,
}

// ============================================================================
// SECTION: Whole-Case Errors
// ============================================================================

/// Terminal error reported when an implementation could not run a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseError {
    /// Whether the harness caught the error (as opposed to a crash).
    #[serde(default)]
    pub caught: bool,
    /// Message extracted from the error context when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw error context as reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

// ============================================================================
// SECTION: Implementation Results
// ============================================================================

/// Results one implementation reported during one run.
///
/// # Invariants
/// - Every present entry holds exactly one result per test of its case.
/// - Cases in `errors` have no entry in `cases`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImplementationResults {
    /// Positional results keyed by case sequence number.
    cases: BTreeMap<CaseSeq, Vec<CaseResult>>,
    /// Terminal errors keyed by case sequence number.
    errors: BTreeMap<CaseSeq, CaseError>,
}

impl ImplementationResults {
    /// Returns the positional results for a case, if reported.
    #[must_use]
    pub fn get(&self, seq: CaseSeq) -> Option<&[CaseResult]> {
        self.cases.get(&seq).map(Vec::as_slice)
    }

    /// Returns the terminal error for a case, if one was reported.
    #[must_use]
    pub fn error(&self, seq: CaseSeq) -> Option<&CaseError> {
        self.errors.get(&seq)
    }

    /// Returns true when any record (results or terminal error) covered the case.
    #[must_use]
    pub fn covers(&self, seq: CaseSeq) -> bool {
        self.cases.contains_key(&seq) || self.errors.contains_key(&seq)
    }

    /// Returns the number of cases with positional results.
    #[must_use]
    pub fn reported_cases(&self) -> usize {
        self.cases.len()
    }

    /// Iterates positional results in case order.
    pub fn iter(&self) -> impl Iterator<Item = (CaseSeq, &[CaseResult])> {
        self.cases.iter().map(|(seq, results)| (*seq, results.as_slice()))
    }

    /// Records positional results for a case.
    pub(crate) fn insert_results(&mut self, seq: CaseSeq, results: Vec<CaseResult>) {
        self.cases.insert(seq, results);
    }

    /// Records a terminal error for a case.
    pub(crate) fn insert_error(&mut self, seq: CaseSeq, error: CaseError) {
        self.errors.insert(seq, error);
    }
}
