// crates/bowtie-report-core/src/core/implementation.rs
// ============================================================================
// Module: Implementations
// Description: Systems under test and their static metadata.
// Purpose: Model implementation identity, links, and ingested dialect summaries.
// Dependencies: crate::core::{identifiers, results}, serde
// ============================================================================

//! ## Overview
//! An [`Implementation`] is one validator under test. Its metadata arrives in
//! the run-start record. The per-dialect summaries are computed upstream and
//! consumed as-is; derived statistics for this run live in the aggregator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DialectId;
use crate::core::identifiers::ImplementationId;
use crate::core::results::ImplementationResults;

// ============================================================================
// SECTION: Dialect Summary
// ============================================================================

/// Pre-computed result counts for one dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectSummary {
    /// Total tests run under the dialect, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tests: Option<u64>,
    /// Tests with a wrong verdict.
    #[serde(default)]
    pub failed_tests: u64,
    /// Tests that errored.
    #[serde(default)]
    pub errored_tests: u64,
    /// Tests that were skipped.
    #[serde(default)]
    pub skipped_tests: u64,
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Static implementation metadata from the run-start record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationMetadata {
    /// Display name.
    pub name: String,
    /// Source language identifier (for example `python`).
    pub language: String,
    /// Version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Project homepage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Issue tracker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<String>,
    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Meta-schema URIs the implementation declares support for.
    #[serde(default)]
    pub dialects: Vec<String>,
    /// Operating system of the harness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Operating system version of the harness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    /// Language runtime version of the harness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_version: Option<String>,
    /// Pre-computed per-dialect summaries.
    #[serde(default, rename = "results")]
    pub dialect_results: BTreeMap<DialectId, DialectSummary>,
}

impl ImplementationMetadata {
    /// Returns the preferred external link (homepage, then issue tracker).
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.homepage.as_deref().or(self.issues.as_deref())
    }
}

// ============================================================================
// SECTION: Implementation
// ============================================================================

/// One system under test within a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Implementation {
    /// Identifier from the run-start record.
    pub id: ImplementationId,
    /// Static metadata.
    pub metadata: ImplementationMetadata,
    /// Results reported during this run.
    pub results: ImplementationResults,
}

impl Implementation {
    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the source language identifier.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.metadata.language
    }

    /// Returns the dialects with pre-computed summaries, in identifier order.
    pub fn dialects_with_results(&self) -> impl Iterator<Item = &DialectId> {
        self.metadata.dialect_results.keys()
    }
}

// ============================================================================
// SECTION: Language Display
// ============================================================================

/// Maps a language identifier to its display form.
///
/// Unknown identifiers are returned unchanged.
#[must_use]
pub fn display_language(language: &str) -> &str {
    match language {
        "c" => "C",
        "clojure" => "Clojure",
        "cpp" => "C++",
        "dotnet" => ".NET",
        "go" => "Go",
        "java" => "Java",
        "js" | "javascript" => "JavaScript",
        "kotlin" => "Kotlin",
        "lua" => "Lua",
        "php" => "PHP",
        "python" => "Python",
        "ruby" => "Ruby",
        "rust" => "Rust",
        "scala" => "Scala",
        "ts" | "typescript" => "TypeScript",
        other => other,
    }
}
