// crates/bowtie-report-config/src/lib.rs
// ============================================================================
// Module: Bowtie Report Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for bowtie-report.toml semantics.
// Dependencies: bowtie-report-core, serde, toml
// ============================================================================

//! ## Overview
//! `bowtie-report-config` defines the configuration model for report tooling:
//! badge URLs, ingestion limits, audit logging, and extra dialect catalog
//! entries. Validation is strict and fail-closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
