// crates/bowtie-report-core/src/core/dialect.rs
// ============================================================================
// Module: Dialect Catalog
// Description: Read-only catalog of JSON Schema dialects.
// Purpose: Resolve dialect identifiers to publication dates and display names.
// Dependencies: crate::core::identifiers, thiserror, time
// ============================================================================

//! ## Overview
//! The dialect catalog maps a short dialect identifier (for example
//! `draft2020-12`) to its canonical URI, human-readable name, and first
//! publication date. Presentation orders dialects by descending publication
//! date. Dialect identifiers only ever originate from the catalog itself, so a
//! failed lookup is a programming error surfaced as [`DialectError::Unknown`].
//!
//! ## Invariants
//! - Identifiers and URIs are unique within a catalog.
//! - The catalog is immutable once constructed; extensions build a new catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use time::Date;
use time::macros::date;

use crate::core::identifiers::DialectId;

// ============================================================================
// SECTION: Dialect
// ============================================================================

/// One versioned revision of JSON Schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// Short identifier used in badge paths and result summaries.
    pub id: DialectId,
    /// Canonical meta-schema URI.
    pub uri: String,
    /// Human-readable display name.
    pub pretty_name: String,
    /// Date the dialect was first published.
    pub first_publication_date: Date,
}

impl Dialect {
    /// Creates a dialect entry.
    #[must_use]
    pub fn new(
        id: impl Into<DialectId>,
        uri: impl Into<String>,
        pretty_name: impl Into<String>,
        first_publication_date: Date,
    ) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
            pretty_name: pretty_name.into(),
            first_publication_date,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dialect catalog errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    /// The identifier is not present in the catalog.
    #[error("unknown dialect: {0}")]
    Unknown(DialectId),
    /// The URI is not present in the catalog.
    #[error("unknown dialect uri: {0}")]
    UnknownUri(String),
    /// An identifier was registered twice.
    #[error("duplicate dialect id: {0}")]
    DuplicateId(DialectId),
    /// A URI was registered twice.
    #[error("duplicate dialect uri: {0}")]
    DuplicateUri(String),
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Read-only dialect lookup keyed by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectCatalog {
    /// Catalog entries in registration order.
    dialects: Vec<Dialect>,
}

impl DialectCatalog {
    /// Builds a catalog from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError`] when identifiers or URIs repeat.
    pub fn new(dialects: Vec<Dialect>) -> Result<Self, DialectError> {
        for (index, dialect) in dialects.iter().enumerate() {
            for earlier in &dialects[.. index] {
                if earlier.id == dialect.id {
                    return Err(DialectError::DuplicateId(dialect.id.clone()));
                }
                if earlier.uri == dialect.uri {
                    return Err(DialectError::DuplicateUri(dialect.uri.clone()));
                }
            }
        }
        Ok(Self {
            dialects,
        })
    }

    /// Returns the built-in JSON Schema dialect catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            dialects: vec![
                Dialect::new(
                    "draft2020-12",
                    "https://json-schema.org/draft/2020-12/schema",
                    "Draft 2020-12",
                    date!(2021 - 01 - 28),
                ),
                Dialect::new(
                    "draft2019-09",
                    "https://json-schema.org/draft/2019-09/schema",
                    "Draft 2019-09",
                    date!(2019 - 09 - 17),
                ),
                Dialect::new(
                    "draft7",
                    "http://json-schema.org/draft-07/schema#",
                    "Draft 7",
                    date!(2017 - 11 - 19),
                ),
                Dialect::new(
                    "draft6",
                    "http://json-schema.org/draft-06/schema#",
                    "Draft 6",
                    date!(2017 - 04 - 21),
                ),
                Dialect::new(
                    "draft4",
                    "http://json-schema.org/draft-04/schema#",
                    "Draft 4",
                    date!(2013 - 01 - 31),
                ),
                Dialect::new(
                    "draft3",
                    "http://json-schema.org/draft-03/schema#",
                    "Draft 3",
                    date!(2010 - 11 - 22),
                ),
            ],
        }
    }

    /// Returns a new catalog with `extra` entries appended.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError`] when an extra entry collides with an existing one.
    pub fn extended(&self, extra: Vec<Dialect>) -> Result<Self, DialectError> {
        let mut dialects = self.dialects.clone();
        dialects.extend(extra);
        Self::new(dialects)
    }

    /// Looks up a dialect by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Unknown`] when the identifier is not cataloged.
    pub fn get(&self, id: &DialectId) -> Result<&Dialect, DialectError> {
        self.dialects
            .iter()
            .find(|dialect| &dialect.id == id)
            .ok_or_else(|| DialectError::Unknown(id.clone()))
    }

    /// Looks up a dialect by meta-schema URI.
    ///
    /// Trailing `#` fragments are ignored on both sides.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownUri`] when the URI is not cataloged.
    pub fn by_uri(&self, uri: &str) -> Result<&Dialect, DialectError> {
        let wanted = uri.trim_end_matches('#');
        self.dialects
            .iter()
            .find(|dialect| dialect.uri.trim_end_matches('#') == wanted)
            .ok_or_else(|| DialectError::UnknownUri(uri.to_string()))
    }

    /// Returns true when the identifier is cataloged.
    #[must_use]
    pub fn contains(&self, id: &DialectId) -> bool {
        self.dialects.iter().any(|dialect| &dialect.id == id)
    }

    /// Returns all entries in registration order.
    #[must_use]
    pub fn dialects(&self) -> &[Dialect] {
        &self.dialects
    }

    /// Resolves `ids` and orders them most recent first.
    ///
    /// Ties keep the input order.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Unknown`] for any identifier missing from the catalog.
    pub fn by_recency<'a, I>(&self, ids: I) -> Result<Vec<&Dialect>, DialectError>
    where
        I: IntoIterator<Item = &'a DialectId>,
    {
        let mut resolved = ids.into_iter().map(|id| self.get(id)).collect::<Result<Vec<_>, _>>()?;
        resolved.sort_by(|lhs, rhs| rhs.first_publication_date.cmp(&lhs.first_publication_date));
        Ok(resolved)
    }
}

impl Default for DialectCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
