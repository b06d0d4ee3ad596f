// crates/bowtie-report-core/src/runtime/mod.rs
// ============================================================================
// Module: Bowtie Report Runtime
// Description: Ingestion, aggregation, badge, and filter operations.
// Purpose: Provide the pure transformations from record stream to views.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Runtime components run leaf-first: the [`parser`] decodes records, the
//! [`builder`] folds them into a [`crate::core::Report`], and the
//! [`aggregate`], [`badges`], and [`filter`] modules read the finished report.
//! All operations are synchronous and I/O-free.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregate;
pub mod badges;
pub mod builder;
pub mod filter;
pub mod ingest;
pub mod parser;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregate::CaseMatrix;
pub use aggregate::ImplementationStats;
pub use aggregate::ImplementationSummary;
pub use aggregate::MatrixRow;
pub use aggregate::case_results;
pub use aggregate::full_matrix;
pub use aggregate::matrix;
pub use aggregate::stats_for;
pub use aggregate::summarize;
pub use aggregate::summarize_selected;
pub use badges::Badge;
pub use badges::BadgeError;
pub use badges::BadgeSite;
pub use badges::EmbedFormat;
pub use badges::available_badges;
pub use badges::compliance_badge;
pub use badges::compliance_badge_for;
pub use badges::compliance_badges;
pub use badges::versions_badge_for;
pub use builder::BuildError;
pub use builder::ReportBuilder;
pub use filter::ReportFilter;
pub use filter::Segment;
pub use filter::highlight;
pub use filter::report_languages;
pub use ingest::IngestOutcome;
pub use ingest::ingest_lines;
pub use ingest::ingest_str;
pub use parser::MalformedReason;
pub use parser::MalformedRecord;
pub use parser::ParserLimits;
pub use parser::RecordParser;
pub use parser::decode_record;
