// crates/bowtie-report-core/src/core/report.rs
// ============================================================================
// Module: Report Model
// Description: Immutable in-memory model of one processed run.
// Purpose: Own cases and implementations in flat, ordered containers.
// Dependencies: crate::core::{case, dialect, identifiers, implementation, records}
// ============================================================================

//! ## Overview
//! A [`Report`] is the result of folding one record stream. Cases live in
//! declaration order and are addressed by [`CaseSeq`], which doubles as the
//! index into the case listing. Implementations own their results; results
//! refer to cases by sequence number only.
//!
//! ## Invariants
//! - `cases[i].seq == CaseSeq::new(i)`.
//! - The model is never mutated after the builder returns it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::core::case::Case;
use crate::core::dialect::Dialect;
use crate::core::dialect::DialectCatalog;
use crate::core::dialect::DialectError;
use crate::core::identifiers::CaseSeq;
use crate::core::identifiers::ImplementationId;
use crate::core::implementation::Implementation;
use crate::core::records::RunCompletion;

// ============================================================================
// SECTION: Run Info
// ============================================================================

/// Run-level metadata copied from the run-start record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    /// Meta-schema URI of the dialect the run targets.
    pub dialect_uri: Option<String>,
    /// Version of the harness that produced the run.
    pub bowtie_version: Option<String>,
    /// Start timestamp as reported.
    pub started: Option<String>,
    /// Free-form run metadata.
    pub metadata: Value,
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Immutable model of one processed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Run metadata.
    run: RunInfo,
    /// Cases in declaration order.
    cases: Vec<Case>,
    /// Implementations in identifier order.
    implementations: Vec<Implementation>,
    /// Completion marker, when the stream carried one.
    completion: Option<RunCompletion>,
}

impl Report {
    /// Assembles a report; only the builder constructs reports.
    pub(crate) const fn new(
        run: RunInfo,
        cases: Vec<Case>,
        implementations: Vec<Implementation>,
        completion: Option<RunCompletion>,
    ) -> Self {
        Self {
            run,
            cases,
            implementations,
            completion,
        }
    }

    /// Returns run metadata.
    #[must_use]
    pub const fn run(&self) -> &RunInfo {
        &self.run
    }

    /// Returns cases in declaration order.
    #[must_use]
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Returns the case with the given sequence number.
    #[must_use]
    pub fn case(&self, seq: CaseSeq) -> Option<&Case> {
        usize::try_from(seq.get()).ok().and_then(|index| self.cases.get(index))
    }

    /// Returns implementations in identifier order.
    #[must_use]
    pub fn implementations(&self) -> &[Implementation] {
        &self.implementations
    }

    /// Returns the implementation with the given identifier.
    #[must_use]
    pub fn implementation(&self, id: &ImplementationId) -> Option<&Implementation> {
        self.implementations.iter().find(|implementation| &implementation.id == id)
    }

    /// Returns the completion marker, when present.
    #[must_use]
    pub const fn completion(&self) -> Option<RunCompletion> {
        self.completion
    }

    /// Returns true when the stream carried a completion marker.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    /// Returns the total number of tests across all cases.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.cases.iter().map(Case::test_count).sum()
    }

    /// Resolves the run's dialect against a catalog.
    ///
    /// Returns `None` when the run did not name a dialect.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownUri`] when the URI is not cataloged.
    pub fn dialect<'c>(
        &self,
        catalog: &'c DialectCatalog,
    ) -> Option<Result<&'c Dialect, DialectError>> {
        self.run.dialect_uri.as_deref().map(|uri| catalog.by_uri(uri))
    }
}
