// crates/bowtie-report-core/src/runtime/filter.rs
// ============================================================================
// Module: Report Filters
// Description: Caller-held language and search filters over a report.
// Purpose: Select implementations and cases without mutating the report.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A [`ReportFilter`] is plain configuration: a set of language identifiers
//! and an optional search string. It is built from opaque query pairs and
//! passed into pure query functions. Toggling a language returns a new filter.
//!
//! Search matching is literal and case-insensitive.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::Case;
use crate::core::Implementation;
use crate::core::Report;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Query key selecting a language; may repeat.
pub const LANGUAGE_KEY: &str = "language";

/// Query key carrying the search text.
pub const SEARCH_KEY: &str = "search";

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Language and search selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Selected language identifiers; empty selects all.
    languages: BTreeSet<String>,
    /// Search text; `None` selects all.
    search: Option<String>,
}

impl ReportFilter {
    /// Creates a filter that selects everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from query pairs.
    ///
    /// Repeated `language` keys accumulate; the last `search` key wins.
    /// Unknown keys are ignored.
    #[must_use]
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs.into_iter().fold(Self::new(), |filter, (key, value)| match key {
            LANGUAGE_KEY => filter.with_language(value),
            SEARCH_KEY => filter.with_search(value),
            _ => filter,
        })
    }

    /// Returns the filter as query pairs, languages first in sorted order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> =
            self.languages.iter().map(|language| (LANGUAGE_KEY, language.clone())).collect();
        if let Some(search) = &self.search {
            pairs.push((SEARCH_KEY, search.clone()));
        }
        pairs
    }

    /// Adds a language to the selection. Blank values are ignored.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.trim().is_empty() {
            self.languages.insert(language);
        }
        self
    }

    /// Sets the search text. Empty text clears the search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() { None } else { Some(search) };
        self
    }

    /// Returns a filter with `language` selected if it was not, or removed if it was.
    #[must_use]
    pub fn toggle_language(&self, language: &str) -> Self {
        let mut next = self.clone();
        if !next.languages.remove(language) {
            next = next.with_language(language);
        }
        next
    }

    /// Returns the selected languages in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(String::as_str)
    }

    /// Returns the search text.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns true when the language passes the filter.
    #[must_use]
    pub fn selects_language(&self, language: &str) -> bool {
        self.languages.is_empty() || self.languages.contains(language)
    }

    /// Returns true when the case passes the filter.
    #[must_use]
    pub fn selects_case(&self, case: &Case) -> bool {
        self.search
            .as_deref()
            .is_none_or(|search| find_ignore_case(&case.description, search).is_some())
    }

    /// Returns the selected implementations in report order.
    #[must_use]
    pub fn implementations<'r>(&self, report: &'r Report) -> Vec<&'r Implementation> {
        report
            .implementations()
            .iter()
            .filter(|implementation| self.selects_language(implementation.language()))
            .collect()
    }

    /// Returns the selected cases in declaration order.
    #[must_use]
    pub fn cases<'r>(&self, report: &'r Report) -> Vec<&'r Case> {
        report.cases().iter().filter(|case| self.selects_case(case)).collect()
    }
}

/// Returns the distinct languages present in a report, sorted.
#[must_use]
pub fn report_languages(report: &Report) -> Vec<&str> {
    report
        .implementations()
        .iter()
        .map(Implementation::language)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ============================================================================
// SECTION: Highlighting
// ============================================================================

/// Contiguous slice of highlighted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'t> {
    /// Slice of the original text.
    pub text: &'t str,
    /// Whether the slice matched the search.
    pub matched: bool,
}

/// Splits `text` into matched and unmatched segments.
///
/// Empty search text yields the whole text as one unmatched segment. Empty
/// input yields no segments.
#[must_use]
pub fn highlight<'t>(text: &'t str, search: &str) -> Vec<Segment<'t>> {
    let mut segments = Vec::new();
    if search.is_empty() {
        if !text.is_empty() {
            segments.push(Segment {
                text,
                matched: false,
            });
        }
        return segments;
    }
    let mut rest = text;
    while let Some((start, end)) = find_ignore_case(rest, search) {
        if start > 0 {
            segments.push(Segment {
                text: &rest[.. start],
                matched: false,
            });
        }
        segments.push(Segment {
            text: &rest[start .. end],
            matched: true,
        });
        rest = &rest[end ..];
    }
    if !rest.is_empty() {
        segments.push(Segment {
            text: rest,
            matched: false,
        });
    }
    segments
}

/// Finds the first case-insensitive occurrence of `needle`.
///
/// Returns byte offsets on character boundaries of `haystack`.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    haystack.char_indices().find_map(|(start, _)| {
        match_len(&haystack[start ..], needle).map(|len| (start, start + len))
    })
}

/// Returns the byte length of the prefix of `haystack` matching `needle`.
fn match_len(haystack: &str, needle: &str) -> Option<usize> {
    let mut chars = haystack.char_indices();
    for expected in needle.chars() {
        let (_, actual) = chars.next()?;
        if !chars_match(actual, expected) {
            return None;
        }
    }
    Some(chars.next().map_or(haystack.len(), |(index, _)| index))
}

/// Compares two characters ignoring case.
fn chars_match(lhs: char, rhs: char) -> bool {
    lhs == rhs || lhs.to_lowercase().eq(rhs.to_lowercase())
}
