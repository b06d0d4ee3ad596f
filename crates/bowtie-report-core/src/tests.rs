// crates/bowtie-report-core/src/tests.rs
// ============================================================================
// Module: Bowtie Report Core Unit Tests
// Description: Crate-internal tests for result storage and report assembly.
// Purpose: Exercise crate-private constructors without going through records.
// Dependencies: bowtie-report-core
// ============================================================================

//! ## Overview
//! Unit tests that need crate-private constructors. Stream-level behavior is
//! covered by the integration tests under `tests/`.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

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

use std::borrow::Cow;

use serde_json::json;

use crate::core::Case;
use crate::core::CaseBody;
use crate::core::CaseError;
use crate::core::CaseResult;
use crate::core::CaseSeq;
use crate::core::Implementation;
use crate::core::ImplementationId;
use crate::core::ImplementationMetadata;
use crate::core::ImplementationResults;
use crate::core::Report;
use crate::core::RunInfo;
use crate::core::Test;
use crate::runtime::case_results;
use crate::runtime::stats_for;

fn case(seq: u64, tests: usize) -> Case {
    Case::from_body(
        CaseSeq::new(seq),
        CaseBody {
            description: format!("case {seq}"),
            comment: None,
            schema: json!({}),
            registry: None,
            tests: (0 .. tests)
                .map(|index| Test {
                    description: format!("test {index}"),
                    comment: None,
                    instance: json!(index),
                    valid: Some(true),
                })
                .collect(),
        },
    )
}

fn metadata() -> ImplementationMetadata {
    serde_json::from_value(json!({"name": "validator", "language": "rust"})).unwrap()
}

fn implementation(results: ImplementationResults) -> Implementation {
    Implementation {
        id: ImplementationId::new("rust-validator"),
        metadata: metadata(),
        results,
    }
}

#[test]
fn terminal_error_message_flows_into_default_fill() {
    let mut results = ImplementationResults::default();
    results.insert_error(
        CaseSeq::new(0),
        CaseError {
            caught: true,
            message: Some("schema failed to load".to_string()),
            context: Some(json!({"message": "schema failed to load"})),
        },
    );
    let implementation = implementation(results);
    let filled = case_results(&implementation, &case(0, 3));

    assert!(matches!(filled, Cow::Owned(_)));
    assert_eq!(filled.len(), 3);
    for result in filled.iter() {
        assert_eq!(
            result,
            &CaseResult::Errored {
                message: Some("schema failed to load".to_string()),
            }
        );
    }
    assert!(implementation.results.covers(CaseSeq::new(0)));
    assert_eq!(implementation.results.reported_cases(), 0);
}

#[test]
fn reported_results_are_borrowed_not_copied() {
    let mut results = ImplementationResults::default();
    results.insert_results(
        CaseSeq::new(0),
        vec![
            CaseResult::from_verdict(true, Some(true)),
        ],
    );
    let implementation = implementation(results);
    let filled = case_results(&implementation, &case(0, 1));
    assert!(matches!(filled, Cow::Borrowed(_)));
}

#[test]
fn stats_identity_holds_for_hand_built_report() {
    let mut results = ImplementationResults::default();
    results.insert_results(
        CaseSeq::new(1),
        vec![
            CaseResult::from_verdict(false, Some(true)),
            CaseResult::errored(),
        ],
    );
    let implementation = implementation(results);
    let report = Report::new(
        RunInfo::default(),
        vec![case(0, 1), case(1, 2), case(2, 4)],
        vec![implementation],
        None,
    );
    let stats = stats_for(&report, &report.implementations()[0]);

    assert_eq!(stats.errored_cases + stats.reported_cases, 3);
    assert_eq!(stats.errored_cases, 2);
    assert_eq!(stats.unsuccessful_tests, 1);
    assert_eq!(stats.errored_tests, 1);
    assert_eq!(stats.failed_tests(), 2);
    assert!(!report.is_complete());
    assert_eq!(report.test_count(), 7);
}
