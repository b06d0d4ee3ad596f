// crates/bowtie-report-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded reads and output rendering.
// Purpose: Ensure size limits fail closed and renderers stay consistent.
// Dependencies: bowtie-report-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit` and `read_with_limit` enforce size
//! limits, and that the summary and matrix renderers reflect the aggregator.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use bowtie_report_core::CaseResult;
use bowtie_report_core::IngestOutcome;
use bowtie_report_core::ParserLimits;
use bowtie_report_core::ReportFilter;
use bowtie_report_core::ingest_str;
use bowtie_report_core::matrix;
use bowtie_report_core::summarize;
use serde_json::Value;

use super::ReadLimitError;
use super::cell_label;
use super::highlighted;
use super::language_filter;
use super::read_bytes_with_limit;
use super::read_with_limit;
use super::render_matrix_json;
use super::render_matrix_text;
use super::render_summary_json;
use super::render_summary_markdown;
use super::render_summary_text;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const STREAM: &str = r#"{"implementations": {"rs": {"name": "jsonschema-rs", "language": "rust", "homepage": "https://example.com/rs"}, "py": {"name": "jsonschema", "language": "python"}}, "bowtie_version": "2024.1.1"}
{"case": {"description": "enum with null", "schema": {}, "tests": [{"description": "null", "instance": null, "valid": true}, {"description": "one", "instance": 1, "valid": false}]}, "seq": 0}
{"case": {"description": "type integer", "schema": {}, "tests": [{"description": "int", "instance": 1, "valid": true}]}, "seq": 1}
{"implementation": "rs", "seq": 0, "results": [{"valid": true}, {"valid": true}]}
{"implementation": "rs", "seq": 1, "results": [{"valid": true}]}
{"implementation": "py", "seq": 0, "skipped": true, "message": "unsupported"}
"#;

fn outcome() -> IngestOutcome {
    ingest_str(STREAM, ParserLimits::default()).unwrap()
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.jsonl");
    fs::write(&path, b"ok").unwrap();

    let bytes = read_bytes_with_limit(&path, 16).unwrap();
    assert_eq!(bytes, b"ok");
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.jsonl");
    fs::write(&path, vec![b'x'; 9]).unwrap();

    match read_bytes_with_limit(&path, 8) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 9);
            assert_eq!(limit, 8);
        }
        Err(ReadLimitError::Io(err)) => panic!("unexpected io error: {err}"),
        Ok(_) => panic!("expected size limit failure"),
    }
}

#[test]
fn read_with_limit_stops_streams_one_past_the_limit() {
    let input = vec![b'x'; 64];
    match read_with_limit(input.as_slice(), 10) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 11);
            assert_eq!(limit, 10);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(read_with_limit(&b"exact"[..], 5).unwrap(), b"exact");
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

#[test]
fn summary_text_lists_each_selected_implementation() {
    let outcome = outcome();
    let summaries = summarize(&outcome.report);
    let text = render_summary_text(&outcome.report, None, &summaries);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "Dialect: unspecified | Bowtie: 2024.1.1 | Cases: 2 | Tests: 3 | Run: incomplete"
    );
    assert_eq!(
        lines[1],
        "jsonschema (Python, py): 1 errored cases, 2 skipped, 0 failed (0 unsuccessful, 0 errored)"
    );
    assert_eq!(
        lines[2],
        "jsonschema-rs (Rust, rs): 0 errored cases, 0 skipped, 1 failed (1 unsuccessful, 0 errored)"
    );
}

#[test]
fn summary_markdown_links_names_with_homepages() {
    let outcome = outcome();
    let report = &outcome.report;
    let filter = language_filter(&["rust".to_string()]);
    let summaries = bowtie_report_core::summarize_selected(report, filter.implementations(report));
    let markdown = render_summary_markdown(report, None, &summaries);

    assert!(markdown.starts_with("# Bowtie Report Summary"));
    assert!(markdown.contains("| [jsonschema-rs](https://example.com/rs) | Rust | 0 | 0 | 1 | 0 |"));
    assert!(!markdown.contains("| jsonschema |"));
}

#[test]
fn summary_json_flattens_stats() {
    let outcome = outcome();
    let summaries = summarize(&outcome.report);
    let value: Value =
        serde_json::from_str(&render_summary_json(&outcome, None, &summaries).unwrap()).unwrap();

    assert_eq!(value["cases"], 2);
    assert_eq!(value["complete"], false);
    assert_eq!(value["malformed_records"], 0);
    let python = &value["implementations"][0];
    assert_eq!(python["id"], "py");
    assert_eq!(python["errored_cases"], 1);
    assert_eq!(python["skipped_tests"], 2);
    assert_eq!(python["failed_tests"], 0);
}

#[test]
fn summary_reports_harness_runtime_details() {
    let stream = r#"{"implementations": {"py": {"name": "jsonschema", "language": "python", "language_version": "3.12.1", "os": "Linux", "os_version": "6.1", "source": "https://example.com/src"}, "go": {"name": "gojsonschema", "language": "go", "os": "Darwin"}}}
"#;
    let outcome = ingest_str(stream, ParserLimits::default()).unwrap();
    let summaries = summarize(&outcome.report);

    let text = render_summary_text(&outcome.report, None, &summaries);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "  Runtime: Darwin");
    assert_eq!(lines[4], "  Runtime: Python 3.12.1 on Linux 6.1");
    assert_eq!(lines[5], "  Source: https://example.com/src");

    let value: Value =
        serde_json::from_str(&render_summary_json(&outcome, None, &summaries).unwrap()).unwrap();
    let python = &value["implementations"][1]["runtime"];
    assert_eq!(python["language_version"], "3.12.1");
    assert_eq!(python["os"], "Linux");
    assert_eq!(python["os_version"], "6.1");
    assert_eq!(python["source"], "https://example.com/src");
    let go = &value["implementations"][0]["runtime"];
    assert_eq!(go["os"], "Darwin");
    assert!(go.get("language_version").is_none());
}

#[test]
fn matrix_text_marks_defaults_and_search_hits() {
    let outcome = outcome();
    let report = &outcome.report;
    let filter = ReportFilter::new().with_search("ENUM");
    let grid = matrix(filter.implementations(report), filter.cases(report));
    let text = render_matrix_text(&grid, filter.search());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Columns: jsonschema | jsonschema-rs");
    assert_eq!(lines[1], "Case 0: *enum* with null");
    assert_eq!(lines[2], "  1. null: skip | ok");
    assert_eq!(lines[3], "  2. one: skip | FAIL");
    assert!(lines[4].starts_with("Legend:"));
}

#[test]
fn matrix_json_fills_unreported_cases() {
    let outcome = outcome();
    let report = &outcome.report;
    let filter = ReportFilter::new();
    let grid = matrix(filter.implementations(report), filter.cases(report));
    let value: Value = serde_json::from_str(&render_matrix_json(&grid).unwrap()).unwrap();

    let python = &value["cases"][1]["results"][0];
    assert_eq!(python["implementation"], "py");
    assert_eq!(python["results"][0]["state"], "errored");
    assert_eq!(value["cases"][1]["tests"][0], "int");
}

#[test]
fn cell_labels_follow_the_three_state_outcome() {
    assert_eq!(cell_label(Some(&CaseResult::from_verdict(true, Some(true)))), "ok");
    assert_eq!(cell_label(Some(&CaseResult::from_verdict(true, Some(false)))), "FAIL");
    assert_eq!(
        cell_label(Some(&CaseResult::Skipped {
            message: None,
        })),
        "skip"
    );
    assert_eq!(cell_label(Some(&CaseResult::errored())), "err");
    assert_eq!(cell_label(None), "err");
}

#[test]
fn highlighting_is_optional() {
    assert_eq!(highlighted("Enum values", None), "Enum values");
    assert_eq!(highlighted("Enum values", Some("VAL")), "Enum *val*ues");
}
