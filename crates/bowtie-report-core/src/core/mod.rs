// crates/bowtie-report-core/src/core/mod.rs
// ============================================================================
// Module: Bowtie Report Core Types
// Description: Canonical report model and record event structures.
// Purpose: Provide stable, serializable types for ingested runs.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Core types define the record events decoded from a run stream, the
//! immutable report model built from them, and the dialect catalog used for
//! ordering and labeling. These types are the canonical source of truth for
//! the aggregator, badge generator, and presentation layers.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod case;
pub mod dialect;
pub mod identifiers;
pub mod implementation;
pub mod records;
pub mod report;
pub mod results;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use case::Case;
pub use case::CaseBody;
pub use case::Test;
pub use dialect::Dialect;
pub use dialect::DialectCatalog;
pub use dialect::DialectError;
pub use identifiers::CaseSeq;
pub use identifiers::DialectId;
pub use identifiers::ImplementationId;
pub use identifiers::RecordPosition;
pub use implementation::DialectSummary;
pub use implementation::Implementation;
pub use implementation::ImplementationMetadata;
pub use implementation::display_language;
pub use records::CaseDefinition;
pub use records::CaseResultRecord;
pub use records::PositionedEvent;
pub use records::RecordKind;
pub use records::RecordedOutcome;
pub use records::RunCompletion;
pub use records::RunEvent;
pub use records::RunStart;
pub use records::TestOutcome;
pub use report::Report;
pub use report::RunInfo;
pub use results::CaseError;
pub use results::CaseResult;
pub use results::CellOutcome;
pub use results::ImplementationResults;
pub use results::ResultState;
