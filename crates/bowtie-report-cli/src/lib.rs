// crates/bowtie-report-cli/src/lib.rs
// ============================================================================
// Module: Bowtie Report CLI Library
// Description: Shared helpers for the bowtie-report command-line interface.
// Purpose: Provide reusable components (audit, i18n) for the binary and tests.
// Dependencies: bowtie-report-config, bowtie-report-core, serde, serde_json.
// ============================================================================

//! ## Overview
//! This library houses the CLI's audit sinks and its message catalog. The
//! binary entry point (`src/main.rs`) imports these helpers so every command
//! logs and prints the same way.
//!
//! Report streams are untrusted input: size limits apply before decoding and
//! structural violations fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured ingest audit events and sinks.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
