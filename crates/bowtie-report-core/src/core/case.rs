// crates/bowtie-report-core/src/core/case.rs
// ============================================================================
// Module: Test Cases
// Description: Cases and the tests they contain.
// Purpose: Model one test scenario (schema + ordered instance checks).
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Case`] pairs a schema document with an ordered list of [`Test`]s. The
//! test order is significant: implementation results are positional and are
//! attributed to tests by index.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::CaseSeq;

// ============================================================================
// SECTION: Test
// ============================================================================

/// One instance-validity check within a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    /// Human-readable description.
    pub description: String,
    /// Optional free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Instance validated against the case schema.
    pub instance: Value,
    /// Expected validity when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

// ============================================================================
// SECTION: Case Body
// ============================================================================

/// Case payload as carried by a case-definition record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseBody {
    /// Human-readable description.
    pub description: String,
    /// Optional free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Schema document under test.
    pub schema: Value,
    /// Optional registry of additional schema resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<Value>,
    /// Ordered tests.
    pub tests: Vec<Test>,
}

// ============================================================================
// SECTION: Case
// ============================================================================

/// One test scenario within a report.
///
/// # Invariants
/// - `seq` equals the case's position in the report's case listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    /// Sequence number assigned at ingestion.
    pub seq: CaseSeq,
    /// Human-readable description.
    pub description: String,
    /// Optional free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Schema document under test.
    pub schema: Value,
    /// Optional registry of additional schema resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<Value>,
    /// Ordered tests.
    pub tests: Vec<Test>,
}

impl Case {
    /// Builds a case from a decoded body and its assigned sequence number.
    #[must_use]
    pub fn from_body(seq: CaseSeq, body: CaseBody) -> Self {
        Self {
            seq,
            description: body.description,
            comment: body.comment,
            schema: body.schema,
            registry: body.registry,
            tests: body.tests,
        }
    }

    /// Returns the number of tests declared by the case.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}
