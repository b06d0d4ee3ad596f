// crates/bowtie-report-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The `bowtie-report` binary stores user-facing strings in a small
//! translation catalog so messaging stays consistent across commands.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - Placeholders are substituted in a single pass over the template.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries loaded into the localized message bundle.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "bowtie-report {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.serialize_failed", "Failed to serialize {kind} output: {error}"),
    ("input.kind.report", "report stream"),
    ("input.stdin", "standard input"),
    ("input.read_failed", "Failed to read {kind} from {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.not_utf8", "The {kind} at {path} is not valid UTF-8: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("config.validate.source", "Loaded from {path}."),
    ("config.validate.defaults", "No config file found; using built-in defaults."),
    ("config.validate.dialects", "Dialects available: {count}."),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("ingest.failed", "Invalid report stream at {error}"),
    ("ingest.malformed.entry", "Warning: skipped {error}"),
    (
        "ingest.malformed.summary",
        "Warning: {count} of {records} records were malformed and skipped; results are missing \
         data.",
    ),
    (
        "ingest.malformed.budget_exceeded",
        "Refusing report: {count} malformed records exceed the configured budget of {limit}.",
    ),
    ("dialect.unknown", "The run's dialect is not recognized: {error}"),
    ("dialect.unspecified", "unspecified"),
    ("implementation.unknown", "The report has no implementation named {id}."),
    ("badges.failed", "Failed to derive badges for {id}: {error}"),
    ("run.status.complete", "complete"),
    ("run.status.failed_fast", "stopped early (fail fast)"),
    ("run.status.incomplete", "incomplete"),
    ("run.version.unknown", "unknown"),
    (
        "summary.text.run",
        "Dialect: {dialect} | Bowtie: {version} | Cases: {cases} | Tests: {tests} | Run: {status}",
    ),
    ("summary.text.none", "No implementations match the selected languages."),
    (
        "summary.text.entry",
        "{name} ({language}, {id}): {errored_cases} errored cases, {skipped} skipped, {failed} \
         failed ({unsuccessful} unsuccessful, {errored} errored)",
    ),
    ("summary.text.runtime", "  Runtime: {runtime}"),
    ("summary.text.runtime.language", "{language} {version}"),
    ("summary.text.runtime.os", "{os} {version}"),
    ("summary.text.runtime.on", "{language} on {os}"),
    ("summary.text.source", "  Source: {source}"),
    ("summary.md.header", "# Bowtie Report Summary"),
    ("summary.md.dialect", "- Dialect: {dialect}"),
    ("summary.md.version", "- Bowtie: {version}"),
    ("summary.md.cases", "- Cases: {cases} ({tests} tests)"),
    ("summary.md.status", "- Run: {status}"),
    (
        "summary.md.table_header",
        "| Implementation | Language | Errored cases | Skipped | Failed | Errored tests |",
    ),
    ("summary.md.table_rule", "| --- | --- | ---: | ---: | ---: | ---: |"),
    (
        "summary.md.table_row",
        "| {name} | {language} | {errored_cases} | {skipped} | {failed} | {errored} |",
    ),
    ("summary.md.none", "_No implementations match the selected languages._"),
    ("matrix.text.columns", "Columns: {columns}"),
    ("matrix.text.case", "Case {seq}: {description}"),
    ("matrix.text.test", "  {index}. {description}: {cells}"),
    ("matrix.text.none", "No cases match the search."),
    ("matrix.text.legend", "Legend: ok = correct, FAIL = incorrect, err = errored, skip = skipped"),
    ("matrix.cell.correct", "ok"),
    ("matrix.cell.incorrect", "FAIL"),
    ("matrix.cell.errored", "err"),
    ("matrix.cell.skipped", "skip"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English fallback catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    substitute(template, &args)
}

/// Replaces placeholders in one pass over `template`.
///
/// Substituted values are never rescanned, so argument text that looks like
/// a placeholder is emitted verbatim.
fn substitute(template: &str, args: &[MessageArg]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[.. open]);
        let after = &rest[open ..];
        let Some(close) = after.find('}') else {
            rest = after;
            break;
        };
        let name = &after[1 .. close];
        match args.iter().find(|arg| arg.key == name) {
            Some(arg) => result.push_str(&arg.value),
            None => result.push_str(&after[..= close]),
        }
        rest = &after[close + 1 ..];
    }
    result.push_str(rest);
    result
}

/// Returns the static English catalog used by the CLI.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

/// Returns every catalog key.
#[cfg(test)]
pub(crate) fn catalog_keys() -> impl Iterator<Item = &'static str> {
    CATALOG_ITEMS.iter().map(|(key, _)| *key)
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
