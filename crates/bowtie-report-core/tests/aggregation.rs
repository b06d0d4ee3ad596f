// crates/bowtie-report-core/tests/aggregation.rs
// ============================================================================
// Module: Aggregation Tests
// Description: Derived statistics and matrix cells over ingested reports.
// Purpose: Validate the missing-coverage rule and count identities.
// ============================================================================

//! Aggregator integration tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use bowtie_report_core::CaseResult;
use bowtie_report_core::CellOutcome;
use bowtie_report_core::ImplementationStats;
use bowtie_report_core::ResultState;
use bowtie_report_core::case_results;
use bowtie_report_core::full_matrix;
use bowtie_report_core::stats_for;
use bowtie_report_core::summarize;
use serde_json::json;
use support::TestResult;
use support::case_error;
use support::case_record;
use support::case_skipped;
use support::completed;
use support::ensure;
use support::entries;
use support::ingest;
use support::run_start;
use support::verdicts;

#[test]
fn unreported_case_counts_as_one_errored_case() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(0, "two tests", &[Some(true), Some(false)]),
        case_record(1, "one test", &[Some(true)]),
        verdicts("a", 0, &[true, false]),
        completed(false),
    ]);
    let report = &outcome.report;
    let implementation = &report.implementations()[0];
    let stats = stats_for(report, implementation);

    ensure(stats.errored_cases == 1, "one errored case")?;
    ensure(stats.errored_tests == 0, "no errored tests")?;
    ensure(stats.unsuccessful_tests == 0, "no unsuccessful tests")?;
    ensure(stats.skipped_tests == 0, "no skipped tests")?;

    let matrix = full_matrix(report);
    let cell = &matrix.rows[1].cells[0];
    ensure(**cell == [CaseResult::errored()], "single errored cell for case 1")?;
    Ok(())
}

#[test]
fn fully_correct_run_has_zero_counts() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust"), ("b", "python")]),
        case_record(0, "first", &[Some(true), Some(false)]),
        case_record(1, "second", &[None]),
        verdicts("a", 0, &[true, false]),
        verdicts("a", 1, &[false]),
        verdicts("b", 0, &[true, false]),
        verdicts("b", 1, &[true]),
    ]);
    for summary in summarize(&outcome.report) {
        ensure(summary.stats.is_clean(), "all counts zero")?;
        ensure(summary.stats.failed_tests() == 0, "nothing failed")?;
        ensure(summary.stats.reported_cases == 2, "both cases reported")?;
    }
    Ok(())
}

#[test]
fn errored_case_tests_are_not_double_counted() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(0, "loads", &[Some(true), Some(true), Some(false)]),
        case_record(1, "does not load", &[Some(true), Some(true)]),
        case_record(2, "skipped", &[Some(true), Some(true)]),
        entries(
            "a",
            0,
            &[json!({"valid": false}), json!({"errored": true}), json!({"skipped": true})],
        ),
        case_error("a", 1, "bad $ref"),
        case_skipped("a", 2, "unsupported"),
    ]);
    let report = &outcome.report;
    let stats = stats_for(report, &report.implementations()[0]);

    ensure(
        stats
            == ImplementationStats {
                errored_cases: 1,
                skipped_tests: 3,
                unsuccessful_tests: 1,
                errored_tests: 1,
                reported_cases: 2,
            },
        "counts match",
    )?;
    ensure(stats.failed_tests() == 2, "failed is unsuccessful plus errored")?;
    Ok(())
}

#[test]
fn default_fill_matches_declared_test_count() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust"), ("b", "go")]),
        case_record(0, "wide", &[Some(true); 5]),
        verdicts("a", 0, &[true; 5]),
        case_error("b", 0, "segfault"),
    ]);
    let report = &outcome.report;
    let case = &report.cases()[0];
    let missing = report.implementations().iter().find(|i| i.id.as_str() == "b").unwrap();
    let filled = case_results(missing, case);

    ensure(filled.len() == case.test_count(), "one slot per declared test")?;
    ensure(
        filled.iter().all(|result| result.state() == ResultState::Errored),
        "every slot errored",
    )?;
    ensure(
        filled[0]
            == CaseResult::Errored {
                message: Some("segfault".to_string()),
            },
        "terminal error message carried into cells",
    )?;

    let matrix = full_matrix(report);
    let outcomes = matrix.rows[0].test_outcomes(4).unwrap();
    ensure(outcomes == [CellOutcome::Correct, CellOutcome::NoVerdict], "cells per column")?;
    ensure(matrix.rows[0].test_outcomes(5).is_none(), "out of range test")?;
    Ok(())
}

#[test]
fn statistics_agree_with_matrix_cells() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(0, "first", &[Some(true), Some(false)]),
        case_record(1, "second", &[Some(true)]),
        case_record(2, "third", &[Some(false), Some(false), Some(true)]),
        verdicts("a", 0, &[false, false]),
        entries("a", 2, &[json!({"errored": true}), json!({"valid": false}), json!({"valid": true})]),
    ]);
    let report = &outcome.report;
    let stats = stats_for(report, &report.implementations()[0]);
    let matrix = full_matrix(report);

    let mut errored_cells = 0_u64;
    let mut incorrect_cells = 0_u64;
    for row in &matrix.rows {
        for result in row.cells[0].iter() {
            match result.outcome() {
                CellOutcome::Incorrect => incorrect_cells += 1,
                CellOutcome::NoVerdict if result.state() == ResultState::Errored => {
                    errored_cells += 1;
                }
                _ => {}
            }
        }
    }
    let absorbed = u64::try_from(report.cases()[1].test_count())?;
    ensure(incorrect_cells == stats.unsuccessful_tests, "incorrect cells match")?;
    ensure(errored_cells == stats.errored_tests + absorbed, "errored cells match")?;
    ensure(
        stats.errored_cases + stats.reported_cases == u64::try_from(report.cases().len())?,
        "case identity",
    )?;
    Ok(())
}

#[test]
fn rebuilding_yields_identical_statistics() -> TestResult {
    let records = [
        run_start(&[("a", "rust"), ("b", "python")]),
        case_record(0, "first", &[Some(true), Some(false)]),
        verdicts("a", 0, &[true, true]),
        case_error("b", 0, "crash"),
        completed(true),
    ];
    let first = ingest(&records);
    let second = ingest(&records);
    ensure(first == second, "identical outcomes")?;
    let lhs: Vec<ImplementationStats> =
        summarize(&first.report).iter().map(|summary| summary.stats).collect();
    let rhs: Vec<ImplementationStats> =
        summarize(&second.report).iter().map(|summary| summary.stats).collect();
    ensure(serde_json::to_string(&lhs)? == serde_json::to_string(&rhs)?, "byte identical")?;
    Ok(())
}
