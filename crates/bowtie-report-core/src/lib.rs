// crates/bowtie-report-core/src/lib.rs
// ============================================================================
// Module: Bowtie Report Core
// Description: Report ingestion and aggregation engine for validator runs.
// Purpose: Turn run-record streams into immutable reports and derived views.
// Dependencies: serde, serde_json, thiserror, time, url
// ============================================================================

//! ## Overview
//! Bowtie report core ingests the line-oriented record stream of one test
//! run, builds an immutable [`Report`] of cases and implementations, and
//! derives per-implementation statistics, matrix cells, and shareable badges.
//! Invariants:
//! - Case sequence numbers are assigned once, in declaration order, from zero.
//! - A case an implementation did not report reads as `errored` for every test.
//! - Reports are never mutated after construction.
//!
//! Security posture: record streams are untrusted; records are size-limited
//! and decode failures are isolated per record.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;
pub use crate::runtime::*;

#[cfg(test)]
mod tests;
