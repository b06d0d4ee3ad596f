// crates/bowtie-report-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Record fixtures and result helpers for report integration tests.
// ============================================================================
//! ## Overview
//! Builders for run-record lines and a Result-based assertion helper.

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
#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::error::Error;
use std::fmt;

use bowtie_report_core::IngestOutcome;
use bowtie_report_core::ParserLimits;
use bowtie_report_core::ingest_str;
use serde_json::Value;
use serde_json::json;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across report integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Record Fixtures
// ========================================================================

/// Run-start record declaring `(id, language)` implementations.
pub fn run_start(implementations: &[(&str, &str)]) -> Value {
    let mut declared = serde_json::Map::new();
    for (id, language) in implementations {
        declared.insert(
            (*id).to_string(),
            json!({
                "name": id,
                "language": language,
                "version": "1.0.0",
                "homepage": format!("https://example.com/{id}"),
                "dialects": ["https://json-schema.org/draft/2020-12/schema"],
            }),
        );
    }
    json!({
        "implementations": declared,
        "dialect": "https://json-schema.org/draft/2020-12/schema",
        "bowtie_version": "2024.1.1",
        "started": "2024-01-01T00:00:00Z",
        "metadata": {},
    })
}

/// Run-start record for a single implementation with per-dialect summaries.
pub fn run_start_with_results(id: &str, dialects: &[&str]) -> Value {
    let mut results = serde_json::Map::new();
    for dialect in dialects {
        results.insert(
            (*dialect).to_string(),
            json!({"failed_tests": 1, "errored_tests": 0, "skipped_tests": 2}),
        );
    }
    json!({
        "implementations": {
            id: {"name": id, "language": "python", "results": results},
        },
    })
}

/// Case-definition record with one test per expectation.
pub fn case_record(seq: u64, description: &str, expectations: &[Option<bool>]) -> Value {
    let tests: Vec<Value> = expectations
        .iter()
        .enumerate()
        .map(|(index, valid)| {
            let mut test = json!({"description": format!("test {index}"), "instance": index});
            if let Some(valid) = valid {
                test["valid"] = json!(valid);
            }
            test
        })
        .collect();
    json!({
        "seq": seq,
        "case": {"description": description, "schema": {"type": "integer"}, "tests": tests},
    })
}

/// Result record carrying one verdict per test.
pub fn verdicts(implementation: &str, seq: u64, valid: &[bool]) -> Value {
    let results: Vec<Value> = valid.iter().map(|valid| json!({"valid": valid})).collect();
    json!({"implementation": implementation, "seq": seq, "results": results})
}

/// Result record carrying raw per-test entries.
pub fn entries(implementation: &str, seq: u64, results: &[Value]) -> Value {
    json!({"implementation": implementation, "seq": seq, "results": results})
}

/// Terminal-error result record.
pub fn case_error(implementation: &str, seq: u64, message: &str) -> Value {
    json!({
        "implementation": implementation,
        "seq": seq,
        "caught": true,
        "context": {"message": message},
    })
}

/// Whole-case skip record.
pub fn case_skipped(implementation: &str, seq: u64, message: &str) -> Value {
    json!({"implementation": implementation, "seq": seq, "skipped": true, "message": message})
}

/// Completion record.
pub fn completed(did_fail_fast: bool) -> Value {
    json!({"did_fail_fast": did_fail_fast})
}

/// Joins records into a newline-delimited stream.
pub fn stream(records: &[Value]) -> String {
    records.iter().map(Value::to_string).collect::<Vec<_>>().join("\n")
}

/// Ingests records with default limits.
pub fn ingest(records: &[Value]) -> IngestOutcome {
    ingest_str(&stream(records), ParserLimits::default()).unwrap()
}
