// crates/bowtie-report-core/src/core/identifiers.rs
// ============================================================================
// Module: Bowtie Report Identifiers
// Description: Canonical identifiers for implementations, dialects, and cases.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout the report model.
//! Implementation and dialect identifiers are opaque strings that serialize
//! transparently. Case sequence numbers are assigned by the report builder
//! and are plain integer keys, never references into the case listing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Implementation identifier as declared by the run-start record.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementationId(String);

impl ImplementationId {
    /// Creates a new implementation identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImplementationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ImplementationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImplementationId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Dialect short identifier (for example `draft2020-12`).
///
/// # Invariants
/// - Opaque UTF-8 string; catalog membership is checked at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialectId(String);

impl DialectId {
    /// Creates a new dialect identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DialectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DialectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DialectId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Case sequence number assigned at ingestion.
///
/// # Invariants
/// - Zero-based declaration index; never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseSeq(u64);

impl CaseSeq {
    /// Creates a case sequence number from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CaseSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Position of a record in the input stream.
///
/// # Invariants
/// - One-based line number; blank lines still advance the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPosition(u64);

impl RecordPosition {
    /// Creates a record position from a one-based line number.
    #[must_use]
    pub const fn new(line: u64) -> Self {
        Self(line)
    }

    /// Returns the one-based line number.
    #[must_use]
    pub const fn line(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}
