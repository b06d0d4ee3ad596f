// crates/bowtie-report-core/tests/ingestion.rs
// ============================================================================
// Module: Ingestion Tests
// Description: Record decoding and report construction over whole streams.
// Purpose: Validate malformed-record isolation and structural build errors.
// ============================================================================

//! Ingestion integration tests.

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

use bowtie_report_core::BuildError;
use bowtie_report_core::CaseResult;
use bowtie_report_core::CaseSeq;
use bowtie_report_core::DialectCatalog;
use bowtie_report_core::ImplementationId;
use bowtie_report_core::MalformedReason;
use bowtie_report_core::ParserLimits;
use bowtie_report_core::RecordKind;
use bowtie_report_core::RecordParser;
use bowtie_report_core::RecordPosition;
use bowtie_report_core::RunEvent;
use bowtie_report_core::decode_record;
use bowtie_report_core::ingest_str;
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
use support::stream;
use support::verdicts;

// ============================================================================
// SECTION: Parser
// ============================================================================

#[test]
fn malformed_record_between_good_ones_is_skipped_and_counted() -> TestResult {
    let input = format!(
        "{}\n{{not json\n{}\n{}",
        run_start(&[("a", "rust")]),
        case_record(0, "first", &[Some(true)]),
        verdicts("a", 0, &[true]),
    );
    let outcome = ingest_str(&input, ParserLimits::default())?;

    ensure(outcome.malformed_count() == 1, "one malformed record")?;
    ensure(outcome.malformed[0].position == RecordPosition::new(2), "position is line 2")?;
    ensure(outcome.records == 4, "all non-blank records counted")?;
    ensure(outcome.report.cases().len() == 1, "case survived")?;
    let implementation = outcome.report.implementation(&ImplementationId::new("a")).unwrap();
    ensure(implementation.results.get(CaseSeq::new(0)).is_some(), "result survived")?;
    Ok(())
}

#[test]
fn blank_lines_are_neither_records_nor_malformed() -> TestResult {
    let input = format!("\n{}\n   \n\n{}\n", run_start(&[("a", "go")]), completed(false));
    let outcome = ingest_str(&input, ParserLimits::default())?;
    ensure(outcome.is_clean(), "no malformed records")?;
    ensure(outcome.records == 2, "two records")?;
    ensure(outcome.report.is_complete(), "completion recorded")?;
    Ok(())
}

#[test]
fn malformed_reasons_are_classified() {
    let limits = ParserLimits::default();
    let position = RecordPosition::new(7);
    let reason = |line: &str| decode_record(position, line, limits).unwrap_err().reason;

    assert!(matches!(reason("{"), MalformedReason::InvalidJson(_)));
    assert_eq!(reason("[1, 2]"), MalformedReason::NotAnObject);
    assert_eq!(reason(r#"{"unrelated": 1}"#), MalformedReason::UnknownKind);
    assert!(matches!(
        reason(r#"{"implementation": "a", "seq": -1, "results": []}"#),
        MalformedReason::InvalidShape {
            kind: RecordKind::CaseResultRecorded,
            ..
        }
    ));
    assert!(matches!(
        reason(r#"{"case": {"description": "missing schema"}}"#),
        MalformedReason::InvalidShape {
            kind: RecordKind::CaseDefined,
            ..
        }
    ));
    assert!(matches!(
        reason(r#"{"implementation": "a", "seq": 0, "results": [{"valid": "yes"}]}"#),
        MalformedReason::InvalidShape { .. }
    ));
}

#[test]
fn oversized_records_are_rejected_before_decoding() {
    let limits = ParserLimits {
        max_record_bytes: 16,
    };
    let line = completed(true).to_string() + &" ".repeat(32);
    let err = decode_record(RecordPosition::new(1), &line, limits).unwrap_err();
    assert!(matches!(
        err.reason,
        MalformedReason::TooLarge {
            limit: 16,
            ..
        }
    ));
}

#[test]
fn parser_tracks_positions_and_counts() {
    let mut parser = RecordParser::new(ParserLimits::default());
    assert!(parser.feed("").unwrap().is_none());
    let event = parser.feed(&completed(false).to_string()).unwrap().unwrap();
    assert_eq!(event.position, RecordPosition::new(2));
    assert!(matches!(event.event, RunEvent::RunCompleted(_)));
    assert!(parser.feed("nope").is_err());
    assert_eq!(parser.records(), 2);
    assert_eq!(parser.malformed(), 1);
}

#[test]
fn result_entries_decode_each_outcome_form() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(0, "mixed", &[Some(true), Some(false), None, Some(true)]),
        entries(
            "a",
            0,
            &[
                json!({"valid": true}),
                json!({"valid": true}),
                json!({"skipped": true, "message": "unsupported"}),
                json!({"errored": true, "context": {"message": "boom"}}),
            ],
        ),
    ]);
    let implementation = &outcome.report.implementations()[0];
    let results = implementation.results.get(CaseSeq::new(0)).unwrap();
    ensure(
        *results
            == [
                CaseResult::Successful {
                    valid: true,
                },
                CaseResult::Unsuccessful {
                    valid: true,
                },
                CaseResult::Skipped {
                    message: Some("unsupported".to_string()),
                },
                CaseResult::Errored {
                    message: Some("boom".to_string()),
                },
            ],
        "outcomes classified in test order",
    )?;
    Ok(())
}

#[test]
fn record_expectations_fill_tests_without_one() -> TestResult {
    let mut record = verdicts("a", 0, &[true, true]);
    record["expected"] = json!([false, null]);
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(0, "unknown expectations", &[None, None]),
        record,
    ]);
    let results = outcome.report.implementations()[0].results.get(CaseSeq::new(0)).unwrap();
    ensure(
        results[0]
            == CaseResult::Unsuccessful {
                valid: true,
            },
        "record expectation applied",
    )?;
    ensure(
        results[1]
            == CaseResult::Successful {
                valid: true,
            },
        "unknown expectation cannot be contradicted",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Builder
// ============================================================================

#[test]
fn declared_sequence_numbers_are_reassigned_from_zero() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(10, "ten", &[Some(true)]),
        case_record(20, "twenty", &[Some(true), Some(false)]),
        verdicts("a", 20, &[true, false]),
        completed(false),
    ]);
    let report = &outcome.report;
    ensure(report.cases()[0].seq == CaseSeq::new(0), "first case is 0")?;
    ensure(report.cases()[1].seq == CaseSeq::new(1), "second case is 1")?;
    ensure(report.case(CaseSeq::new(1)).unwrap().description == "twenty", "lookup by seq")?;
    let results = &report.implementations()[0].results;
    ensure(results.get(CaseSeq::new(1)).is_some(), "result attached to assigned seq")?;
    ensure(results.get(CaseSeq::new(0)).is_none(), "first case unreported")?;
    Ok(())
}

#[test]
fn implicit_case_numbers_skip_explicit_ones() -> TestResult {
    let mut implicit = case_record(0, "implicit", &[Some(true)]);
    implicit.as_object_mut().unwrap().remove("seq");
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(1, "explicit", &[Some(true)]),
        implicit,
        verdicts("a", 2, &[true]),
    ]);
    let report = &outcome.report;
    ensure(report.cases().len() == 2, "both cases kept")?;
    ensure(report.cases()[1].description == "implicit", "implicit case second")?;
    let results = &report.implementations()[0].results;
    ensure(results.get(CaseSeq::new(1)).is_some(), "result reaches the implicit case")?;
    ensure(results.get(CaseSeq::new(0)).is_none(), "explicit case unreported")?;
    Ok(())
}

#[test]
fn result_before_case_is_out_of_order() {
    let err = ingest_str(
        &stream(&[run_start(&[("a", "rust")]), verdicts("a", 0, &[true])]),
        ParserLimits::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        BuildError::OutOfOrderReference {
            position: RecordPosition::new(2),
            implementation: ImplementationId::new("a"),
            seq: 0,
        }
    );
    assert_eq!(err.seq(), Some(0));
    assert_eq!(err.implementation(), Some(&ImplementationId::new("a")));
    assert!(err.to_string().contains("line 2"));
}

fn build_error(records: &[serde_json::Value]) -> BuildError {
    ingest_str(&stream(records), ParserLimits::default()).unwrap_err()
}

#[test]
fn structural_violations_are_fatal() {
    let start = run_start(&[("a", "rust")]);
    let case = case_record(0, "only", &[Some(true), Some(true)]);

    assert!(matches!(
        build_error(&[case.clone()]),
        BuildError::MissingRunStart {
            kind: RecordKind::CaseDefined,
            ..
        }
    ));
    assert!(matches!(
        build_error(&[start.clone(), start.clone()]),
        BuildError::DuplicateRunStart { .. }
    ));
    assert!(matches!(
        build_error(&[start.clone(), case.clone(), case.clone()]),
        BuildError::DuplicateCase {
            seq: 0,
            ..
        }
    ));
    assert!(matches!(
        build_error(&[start.clone(), case.clone(), verdicts("b", 0, &[true, true])]),
        BuildError::UnknownImplementation { .. }
    ));
    assert!(matches!(
        build_error(&[
            start.clone(),
            case.clone(),
            verdicts("a", 0, &[true, true]),
            case_error("a", 0, "again"),
        ]),
        BuildError::DuplicateResult { .. }
    ));
    assert!(matches!(
        build_error(&[start.clone(), case.clone(), verdicts("a", 0, &[true])]),
        BuildError::ResultLengthMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));
    assert!(matches!(
        build_error(&[start, completed(false), case]),
        BuildError::RecordAfterCompletion {
            kind: RecordKind::CaseDefined,
            ..
        }
    ));
}

#[test]
fn terminal_errors_leave_the_case_unreported_but_keep_context() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(0, "broken", &[Some(true)]),
        case_error("a", 0, "could not compile schema"),
    ]);
    let results = &outcome.report.implementations()[0].results;
    ensure(results.get(CaseSeq::new(0)).is_none(), "no result entry")?;
    let error = results.error(CaseSeq::new(0)).unwrap();
    ensure(error.caught, "caught flag kept")?;
    ensure(error.message.as_deref() == Some("could not compile schema"), "message extracted")?;
    Ok(())
}

#[test]
fn whole_case_skip_expands_per_test() -> TestResult {
    let outcome = ingest(&[
        run_start(&[("a", "rust")]),
        case_record(0, "skipped", &[Some(true), Some(false), None]),
        case_skipped("a", 0, "unsupported dialect"),
    ]);
    let results = outcome.report.implementations()[0].results.get(CaseSeq::new(0)).unwrap();
    ensure(results.len() == 3, "one result per test")?;
    ensure(
        results.iter().all(|result| {
            result
                == &CaseResult::Skipped {
                    message: Some("unsupported dialect".to_string()),
                }
        }),
        "every test skipped with the message",
    )?;
    Ok(())
}

#[test]
fn run_metadata_and_completion_are_recorded() -> TestResult {
    let outcome = ingest(&[run_start(&[("b", "go"), ("a", "rust")]), completed(true)]);
    let report = &outcome.report;
    let ids: Vec<&str> =
        report.implementations().iter().map(|implementation| implementation.id.as_str()).collect();
    ensure(ids == ["a", "b"], "implementations in identifier order")?;
    ensure(report.completion().is_some_and(|completion| completion.did_fail_fast), "fail fast")?;
    ensure(report.run().bowtie_version.as_deref() == Some("2024.1.1"), "version kept")?;
    let catalog = DialectCatalog::builtin();
    let dialect = report.dialect(&catalog).unwrap()?;
    ensure(dialect.id.as_str() == "draft2020-12", "dialect resolved from uri")?;
    Ok(())
}

#[test]
fn empty_stream_yields_empty_report() -> TestResult {
    let outcome = ingest_str("", ParserLimits::default())?;
    ensure(outcome.report.cases().is_empty(), "no cases")?;
    ensure(outcome.report.implementations().is_empty(), "no implementations")?;
    ensure(!outcome.report.is_complete(), "not complete")?;
    Ok(())
}
