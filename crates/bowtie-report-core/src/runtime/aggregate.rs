// crates/bowtie-report-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Aggregator
// Description: Derived statistics and matrix cells over a built report.
// Purpose: Apply the missing-coverage rule once for counts and cells alike.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Matrix cells read results through [`case_results`], which fills a case
//! the implementation never reported with one `errored` result per test.
//! [`stats_for`] reads the same results entries directly: a case with no
//! entry counts once, in `errored_cases`, and its default-filled tests never
//! again in `errored_tests`. Reported cases are counted from the exact
//! results the matrix borrows.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use serde::Serialize;

use crate::core::Case;
use crate::core::CaseResult;
use crate::core::CellOutcome;
use crate::core::Implementation;
use crate::core::Report;
use crate::core::ResultState;

// ============================================================================
// SECTION: Default Fill
// ============================================================================

/// Returns the results of `implementation` for `case`, default-filled.
///
/// A case without reported results reads as one `errored` result per test,
/// carrying the terminal error message when one was recorded.
#[must_use]
pub fn case_results<'r>(implementation: &'r Implementation, case: &Case) -> Cow<'r, [CaseResult]> {
    implementation.results.get(case.seq).map_or_else(
        || {
            let message =
                implementation.results.error(case.seq).and_then(|error| error.message.clone());
            Cow::Owned(vec![
                CaseResult::Errored {
                    message,
                };
                case.test_count()
            ])
        },
        Cow::Borrowed,
    )
}

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Derived counts for one implementation over one report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImplementationStats {
    /// Cases with no reported results at all.
    pub errored_cases: u64,
    /// Tests skipped within reported cases.
    pub skipped_tests: u64,
    /// Tests with a verdict contradicting the expectation.
    pub unsuccessful_tests: u64,
    /// Tests errored within reported cases.
    pub errored_tests: u64,
    /// Cases with reported results.
    pub reported_cases: u64,
}

impl ImplementationStats {
    /// Returns unsuccessful plus errored tests.
    #[must_use]
    pub const fn failed_tests(&self) -> u64 {
        self.unsuccessful_tests.saturating_add(self.errored_tests)
    }

    /// Returns true when nothing failed, errored, or was skipped.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errored_cases == 0
            && self.skipped_tests == 0
            && self.unsuccessful_tests == 0
            && self.errored_tests == 0
    }
}

/// Computes derived counts for one implementation.
#[must_use]
pub fn stats_for(report: &Report, implementation: &Implementation) -> ImplementationStats {
    let mut stats = ImplementationStats::default();
    for case in report.cases() {
        let Some(results) = implementation.results.get(case.seq) else {
            stats.errored_cases += 1;
            continue;
        };
        stats.reported_cases += 1;
        for result in results {
            match result.state() {
                ResultState::Successful => {}
                ResultState::Unsuccessful => stats.unsuccessful_tests += 1,
                ResultState::Errored => stats.errored_tests += 1,
                ResultState::Skipped => stats.skipped_tests += 1,
            }
        }
    }
    stats
}

/// Statistics paired with their implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplementationSummary<'r> {
    /// Summarized implementation.
    pub implementation: &'r Implementation,
    /// Derived counts.
    pub stats: ImplementationStats,
}

/// Summarizes every implementation of a report in report order.
#[must_use]
pub fn summarize(report: &Report) -> Vec<ImplementationSummary<'_>> {
    summarize_selected(report, report.implementations())
}

/// Summarizes a selection of a report's implementations in the given order.
#[must_use]
pub fn summarize_selected<'r, I>(
    report: &Report,
    implementations: I,
) -> Vec<ImplementationSummary<'r>>
where
    I: IntoIterator<Item = &'r Implementation>,
{
    implementations
        .into_iter()
        .map(|implementation| ImplementationSummary {
            implementation,
            stats: stats_for(report, implementation),
        })
        .collect()
}

// ============================================================================
// SECTION: Matrix
// ============================================================================

/// Case-by-implementation grid of default-filled results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseMatrix<'r> {
    /// Column order.
    pub implementations: Vec<&'r Implementation>,
    /// One row per case.
    pub rows: Vec<MatrixRow<'r>>,
}

/// One case and its results for every matrix column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow<'r> {
    /// Row case.
    pub case: &'r Case,
    /// Results per column, in column order.
    pub cells: Vec<Cow<'r, [CaseResult]>>,
}

impl MatrixRow<'_> {
    /// Returns the outcome of one test across all columns.
    ///
    /// Returns `None` when the test index is out of range.
    #[must_use]
    pub fn test_outcomes(&self, test: usize) -> Option<Vec<CellOutcome>> {
        self.cells
            .iter()
            .map(|cell| cell.get(test).map(CaseResult::outcome))
            .collect()
    }
}

/// Builds the matrix for the given columns and rows.
#[must_use]
pub fn matrix<'r, C>(implementations: Vec<&'r Implementation>, cases: C) -> CaseMatrix<'r>
where
    C: IntoIterator<Item = &'r Case>,
{
    let rows = cases
        .into_iter()
        .map(|case| MatrixRow {
            case,
            cells: implementations
                .iter()
                .map(|&implementation| case_results(implementation, case))
                .collect(),
        })
        .collect();
    CaseMatrix {
        implementations,
        rows,
    }
}

/// Builds the matrix over every case and implementation of a report.
#[must_use]
pub fn full_matrix(report: &Report) -> CaseMatrix<'_> {
    matrix(report.implementations().iter().collect(), report.cases())
}
