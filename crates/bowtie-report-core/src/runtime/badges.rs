// crates/bowtie-report-core/src/runtime/badges.rs
// ============================================================================
// Module: Badge Generator
// Description: Shareable status descriptors and their embed snippets.
// Purpose: Derive stable badge URIs from implementation and dialect identity.
// Dependencies: crate::core, serde, thiserror, url
// ============================================================================

//! ## Overview
//! A [`Badge`] is a target URI plus an alt label. Targets point a badge
//! endpoint at a JSON descriptor hosted under the report site:
//!
//! - versions: `badges/<implementation>/supported_versions.json`
//! - compliance: `badges/<implementation>/compliance/<dialect>.json`
//!
//! Path segments are percent-encoded individually, so identifiers cannot
//! escape their directory. Badge derivation depends only on identifiers and
//! site configuration, never on result counts, so URIs are stable across
//! rebuilds of the same stream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::core::Dialect;
use crate::core::DialectCatalog;
use crate::core::DialectError;
use crate::core::DialectId;
use crate::core::Implementation;
use crate::core::ImplementationId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default badge rendering endpoint.
pub const DEFAULT_BADGE_ENDPOINT: &str = "https://img.shields.io/endpoint";

/// Default site hosting badge descriptors.
pub const DEFAULT_BADGE_SITE: &str = "https://bowtie.report/";

/// Label of the supported-versions badge.
pub const VERSIONS_LABEL: &str = "JSON Schema Versions";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Badge derivation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BadgeError {
    /// A configured URL could not be parsed.
    #[error("invalid badge url {url}: {message}")]
    InvalidUrl {
        /// Offending URL text.
        url: String,
        /// Parser diagnostic.
        message: String,
    },
    /// The site URL cannot carry path segments.
    #[error("badge site cannot be a base url: {0}")]
    CannotBeBase(String),
    /// The implementation has no results for the dialect.
    #[error("{implementation} has no results for {dialect}")]
    NoResults {
        /// Implementation identifier.
        implementation: ImplementationId,
        /// Dialect identifier.
        dialect: DialectId,
    },
    /// The dialect is not cataloged.
    #[error(transparent)]
    Dialect(#[from] DialectError),
}

// ============================================================================
// SECTION: Site
// ============================================================================

/// Badge endpoint and descriptor site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeSite {
    /// Endpoint that renders a descriptor into an image.
    endpoint: Url,
    /// Base URL hosting descriptors.
    site: Url,
}

impl BadgeSite {
    /// Creates a badge site from parsed URLs.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::CannotBeBase`] when `site` cannot carry a path.
    pub fn new(endpoint: Url, site: Url) -> Result<Self, BadgeError> {
        if site.cannot_be_a_base() {
            return Err(BadgeError::CannotBeBase(site.to_string()));
        }
        Ok(Self {
            endpoint,
            site,
        })
    }

    /// Parses a badge site from URL strings.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError`] when either URL is invalid.
    pub fn parse(endpoint: &str, site: &str) -> Result<Self, BadgeError> {
        Self::new(parse_url(endpoint)?, parse_url(site)?)
    }

    /// Returns the public default site.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError`] only if the built-in URLs fail to parse.
    pub fn public() -> Result<Self, BadgeError> {
        Self::parse(DEFAULT_BADGE_ENDPOINT, DEFAULT_BADGE_SITE)
    }

    /// Returns the rendering endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the descriptor site.
    #[must_use]
    pub const fn site(&self) -> &Url {
        &self.site
    }

    /// Builds an endpoint URI pointing at a descriptor under the site.
    fn badge_uri(&self, segments: &[&str]) -> Result<String, BadgeError> {
        let mut target = self.site.clone();
        target
            .path_segments_mut()
            .map_err(|()| BadgeError::CannotBeBase(self.site.to_string()))?
            .pop_if_empty()
            .extend(segments);
        let mut uri = self.endpoint.clone();
        uri.query_pairs_mut().append_pair("url", target.as_str());
        Ok(uri.into())
    }
}

/// Parses one URL.
fn parse_url(raw: &str) -> Result<Url, BadgeError> {
    Url::parse(raw).map_err(|err| BadgeError::InvalidUrl {
        url: raw.to_string(),
        message: err.to_string(),
    })
}

// ============================================================================
// SECTION: Badges
// ============================================================================

/// Shareable status descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Target URI.
    pub uri: String,
    /// Alt label.
    pub label: String,
}

/// Derives the badge listing the dialects an implementation has results for.
///
/// # Errors
///
/// Returns [`BadgeError`] when the site cannot carry the descriptor path.
pub fn versions_badge_for(
    implementation: &Implementation,
    site: &BadgeSite,
) -> Result<Badge, BadgeError> {
    Ok(Badge {
        uri: site.badge_uri(&["badges", implementation.id.as_str(), "supported_versions.json"])?,
        label: VERSIONS_LABEL.to_string(),
    })
}

/// Derives the compliance badge for one implementation under one dialect.
///
/// # Errors
///
/// Returns [`BadgeError`] when the site cannot carry the descriptor path.
pub fn compliance_badge_for(
    implementation: &Implementation,
    dialect: &Dialect,
    site: &BadgeSite,
) -> Result<Badge, BadgeError> {
    let file = format!("{}.json", dialect.id);
    Ok(Badge {
        uri: site.badge_uri(&["badges", implementation.id.as_str(), "compliance", &file])?,
        label: dialect.pretty_name.clone(),
    })
}

/// Derives the compliance badge for a dialect named by identifier.
///
/// # Errors
///
/// Returns [`BadgeError::Dialect`] for an uncataloged dialect and
/// [`BadgeError::NoResults`] when the implementation has no results for it.
pub fn compliance_badge(
    implementation: &Implementation,
    dialect: &DialectId,
    catalog: &DialectCatalog,
    site: &BadgeSite,
) -> Result<Badge, BadgeError> {
    let dialect = catalog.get(dialect)?;
    if !implementation.metadata.dialect_results.contains_key(&dialect.id) {
        return Err(BadgeError::NoResults {
            implementation: implementation.id.clone(),
            dialect: dialect.id.clone(),
        });
    }
    compliance_badge_for(implementation, dialect, site)
}

/// Derives every compliance badge, most recent dialect first.
///
/// # Errors
///
/// Returns [`BadgeError::Dialect`] when a result summary names an
/// uncataloged dialect.
pub fn compliance_badges(
    implementation: &Implementation,
    catalog: &DialectCatalog,
    site: &BadgeSite,
) -> Result<Vec<Badge>, BadgeError> {
    catalog
        .by_recency(implementation.dialects_with_results())?
        .into_iter()
        .map(|dialect| compliance_badge_for(implementation, dialect, site))
        .collect()
}

/// Derives the versions badge followed by every compliance badge.
///
/// # Errors
///
/// Returns [`BadgeError`] under the same conditions as [`compliance_badges`].
pub fn available_badges(
    implementation: &Implementation,
    catalog: &DialectCatalog,
    site: &BadgeSite,
) -> Result<Vec<Badge>, BadgeError> {
    let mut badges = vec![versions_badge_for(implementation, site)?];
    badges.extend(compliance_badges(implementation, catalog, site)?);
    Ok(badges)
}

// ============================================================================
// SECTION: Embeds
// ============================================================================

/// Textual embed formats for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedFormat {
    /// Bare URI.
    Url,
    /// Markdown image.
    Markdown,
    /// reStructuredText image directive.
    Rest,
    /// `AsciiDoc` image macro.
    AsciiDoc,
    /// HTML image element.
    Html,
}

impl EmbedFormat {
    /// All formats in display order.
    pub const ALL: [Self; 5] = [Self::Url, Self::Markdown, Self::Rest, Self::AsciiDoc, Self::Html];

    /// Returns the display name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Markdown => "Markdown",
            Self::Rest => "reST",
            Self::AsciiDoc => "AsciiDoc",
            Self::Html => "HTML",
        }
    }

    /// Renders a badge in this format.
    #[must_use]
    pub fn render(self, badge: &Badge) -> String {
        let uri = &badge.uri;
        let alt = &badge.label;
        match self {
            Self::Url => uri.clone(),
            Self::Markdown => format!("![{alt}]({uri})"),
            Self::Rest => format!(".. image:: {uri}\n :alt: {alt}"),
            Self::AsciiDoc => format!("image:{uri}[{alt}]"),
            Self::Html => format!("<img alt='{alt}' src='{uri}'/>"),
        }
    }
}
