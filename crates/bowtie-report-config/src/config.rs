// crates/bowtie-report-config/src/config.rs
// ============================================================================
// Module: Bowtie Report Configuration
// Description: Configuration loading and validation for report tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: bowtie-report-core, serde, time, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then `BOWTIE_REPORT_CONFIG`, then
//! `bowtie-report.toml` in the working directory. Only the last of these may
//! be absent; an absent default file yields the built-in defaults. Everything
//! else that is missing or invalid fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use bowtie_report_core::BadgeSite;
use bowtie_report_core::Dialect;
use bowtie_report_core::DialectCatalog;
use bowtie_report_core::DialectId;
use bowtie_report_core::ParserLimits;
use bowtie_report_core::runtime::badges::DEFAULT_BADGE_ENDPOINT;
use bowtie_report_core::runtime::badges::DEFAULT_BADGE_SITE;
use bowtie_report_core::runtime::parser::DEFAULT_MAX_RECORD_BYTES;
use serde::Deserialize;
use thiserror::Error;
use time::Date;
use time::macros::format_description;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "bowtie-report.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "BOWTIE_REPORT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Smallest accepted per-record limit.
pub(crate) const MIN_RECORD_BYTES: usize = 1024;
/// Largest accepted per-record limit.
pub(crate) const MAX_RECORD_BYTES: usize = 256 * 1024 * 1024;
/// Default whole-input limit.
pub(crate) const DEFAULT_MAX_INPUT_BYTES: u64 = 512 * 1024 * 1024;
/// Largest accepted whole-input limit.
pub(crate) const MAX_INPUT_BYTES: u64 = 4 * 1024 * 1024 * 1024;
/// Maximum number of configured dialects.
pub(crate) const MAX_DIALECTS: usize = 64;
/// Maximum length of a dialect identifier.
pub(crate) const MAX_DIALECT_ID_LENGTH: usize = 64;
/// Maximum length of a dialect URI or display name.
pub(crate) const MAX_DIALECT_TEXT_LENGTH: usize = 512;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level report tooling configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BowtieReportConfig {
    /// Badge endpoint and site configuration.
    #[serde(default)]
    pub badges: BadgeConfig,
    /// Record ingestion limits.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Additional dialect catalog entries.
    #[serde(default)]
    pub dialects: Vec<DialectConfig>,
    /// File the configuration was read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl BowtieReportConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, origin) = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound && origin == PathOrigin::Default => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(err) => return Err(ConfigError::Io(format!("{}: {err}", resolved.display()))),
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source_path = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.badges.validate()?;
        self.ingest.validate()?;
        self.audit.validate()?;
        if self.dialects.len() > MAX_DIALECTS {
            return Err(ConfigError::Invalid(format!(
                "dialects exceeds max entries ({MAX_DIALECTS})"
            )));
        }
        self.dialect_catalog().map(|_| ())
    }

    /// Returns the built-in dialect catalog extended with configured entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an entry is invalid or collides with another.
    pub fn dialect_catalog(&self) -> Result<DialectCatalog, ConfigError> {
        let extra =
            self.dialects.iter().map(DialectConfig::to_dialect).collect::<Result<Vec<_>, _>>()?;
        DialectCatalog::builtin()
            .extended(extra)
            .map_err(|err| ConfigError::Invalid(format!("dialects: {err}")))
    }

    /// Returns the configured badge site.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the badge URLs are invalid.
    pub fn badge_site(&self) -> Result<BadgeSite, ConfigError> {
        BadgeSite::parse(&self.badges.endpoint, &self.badges.site)
            .map_err(|err| ConfigError::Invalid(format!("badges: {err}")))
    }

    /// Returns the parser limits implied by the ingest section.
    #[must_use]
    pub const fn parser_limits(&self) -> ParserLimits {
        ParserLimits {
            max_record_bytes: self.ingest.max_record_bytes,
        }
    }
}

// ============================================================================
// SECTION: Badges
// ============================================================================

/// Badge endpoint and site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BadgeConfig {
    /// Endpoint rendering badge descriptors.
    #[serde(default = "default_badge_endpoint")]
    pub endpoint: String,
    /// Site hosting badge descriptors; must end in `/`.
    #[serde(default = "default_badge_site")]
    pub site: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_badge_endpoint(),
            site: default_badge_site(),
        }
    }
}

impl BadgeConfig {
    /// Validates badge URLs.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_https_url("badges.endpoint", &self.endpoint)?;
        let site = validate_https_url("badges.site", &self.site)?;
        if !site.path().ends_with('/') {
            return Err(ConfigError::Invalid("badges.site must end with '/'".to_string()));
        }
        if site.query().is_some() || site.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "badges.site must not carry a query or fragment".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Ingest
// ============================================================================

/// Record ingestion limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestConfig {
    /// Maximum size of one record in bytes.
    #[serde(default = "default_max_record_bytes")]
    pub max_record_bytes: usize,
    /// Maximum size of a whole input stream in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
    /// Malformed records tolerated before ingestion is treated as failed.
    #[serde(default)]
    pub max_malformed_records: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_record_bytes: default_max_record_bytes(),
            max_input_bytes: default_max_input_bytes(),
            max_malformed_records: None,
        }
    }
}

impl IngestConfig {
    /// Validates ingestion limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RECORD_BYTES ..= MAX_RECORD_BYTES).contains(&self.max_record_bytes) {
            return Err(ConfigError::Invalid(format!(
                "ingest.max_record_bytes must be between {MIN_RECORD_BYTES} and \
                 {MAX_RECORD_BYTES}"
            )));
        }
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_INPUT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "ingest.max_input_bytes must be between 1 and {MAX_INPUT_BYTES}"
            )));
        }
        let record_bytes = u64::try_from(self.max_record_bytes).unwrap_or(u64::MAX);
        if self.max_input_bytes < record_bytes {
            return Err(ConfigError::Invalid(
                "ingest.max_input_bytes must be at least ingest.max_record_bytes".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true when `malformed` records exceed the configured budget.
    #[must_use]
    pub fn malformed_budget_exceeded(&self, malformed: u64) -> bool {
        self.max_malformed_records.is_some_and(|budget| malformed > budget)
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Emit audit events.
    #[serde(default)]
    pub enabled: bool,
    /// Append audit events to this file instead of stderr.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Dialects
// ============================================================================

/// Additional dialect catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DialectConfig {
    /// Short identifier used in badge paths.
    pub id: String,
    /// Canonical meta-schema URI.
    pub uri: String,
    /// Display name.
    pub pretty_name: String,
    /// First publication date as `YYYY-MM-DD`.
    pub first_publication_date: String,
}

impl DialectConfig {
    /// Validates the entry and converts it to a catalog dialect.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a field is empty, oversized, or malformed.
    pub fn to_dialect(&self) -> Result<Dialect, ConfigError> {
        let id = self.id.trim();
        if id.is_empty() || id.len() > MAX_DIALECT_ID_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "dialects.id must be 1..={MAX_DIALECT_ID_LENGTH} characters"
            )));
        }
        if !id.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')) {
            return Err(ConfigError::Invalid(format!(
                "dialects.id {id} must use ascii letters, digits, '-', '_' or '.'"
            )));
        }
        if self.uri.len() > MAX_DIALECT_TEXT_LENGTH {
            return Err(ConfigError::Invalid(format!("dialects.uri for {id} exceeds max length")));
        }
        Url::parse(&self.uri)
            .map_err(|err| ConfigError::Invalid(format!("dialects.uri for {id}: {err}")))?;
        let pretty_name = self.pretty_name.trim();
        if pretty_name.is_empty() || pretty_name.len() > MAX_DIALECT_TEXT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "dialects.pretty_name for {id} must be non-empty and at most \
                 {MAX_DIALECT_TEXT_LENGTH} bytes"
            )));
        }
        let date = parse_date(&self.first_publication_date).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "dialects.first_publication_date for {id} must be YYYY-MM-DD"
            ))
        })?;
        Ok(Dialect::new(DialectId::new(id), self.uri.clone(), pretty_name, date))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Where the configuration path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathOrigin {
    /// Passed by the caller.
    Explicit,
    /// Read from the environment.
    Environment,
    /// Default filename.
    Default,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, PathOrigin), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), PathOrigin::Explicit));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), PathOrigin::Environment));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), PathOrigin::Default))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Parses an absolute `https` URL.
fn validate_https_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|err| ConfigError::Invalid(format!("{field}: {err}")))?;
    if url.scheme() != "https" {
        return Err(ConfigError::Invalid(format!("{field} must use https")));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(ConfigError::Invalid(format!("{field} must be an absolute url")));
    }
    Ok(url)
}

/// Parses a `YYYY-MM-DD` date.
fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Default badge endpoint.
fn default_badge_endpoint() -> String {
    DEFAULT_BADGE_ENDPOINT.to_string()
}

/// Default badge site.
fn default_badge_site() -> String {
    DEFAULT_BADGE_SITE.to_string()
}

/// Default per-record limit.
pub(crate) const fn default_max_record_bytes() -> usize {
    DEFAULT_MAX_RECORD_BYTES
}

/// Default whole-input limit.
pub(crate) const fn default_max_input_bytes() -> u64 {
    DEFAULT_MAX_INPUT_BYTES
}
