// crates/bowtie-report-cli/src/main.rs
// ============================================================================
// Module: Bowtie Report CLI Entry Point
// Description: Command dispatcher for report summaries, matrices, and badges.
// Purpose: Provide a safe, localized CLI over the report ingestion engine.
// Dependencies: clap, bowtie-report-config, bowtie-report-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `bowtie-report` CLI reads a run-record stream from a file or stdin,
//! builds the report model, and prints per-implementation summaries, the
//! case matrix, or badge embed snippets. All user-facing strings are routed
//! through the i18n catalog. Report streams are untrusted: input size is
//! bounded before decoding and structural violations fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use bowtie_report_cli::audit::AuditEvent;
use bowtie_report_cli::audit::sink_from_config;
use bowtie_report_cli::t;
use bowtie_report_config::BowtieReportConfig;
use bowtie_report_core::CaseMatrix;
use bowtie_report_core::CaseResult;
use bowtie_report_core::CellOutcome;
use bowtie_report_core::Dialect;
use bowtie_report_core::DialectCatalog;
use bowtie_report_core::DialectId;
use bowtie_report_core::EmbedFormat;
use bowtie_report_core::ImplementationId;
use bowtie_report_core::ImplementationMetadata;
use bowtie_report_core::ImplementationStats;
use bowtie_report_core::ImplementationSummary;
use bowtie_report_core::IngestOutcome;
use bowtie_report_core::Report;
use bowtie_report_core::ReportFilter;
use bowtie_report_core::ResultState;
use bowtie_report_core::available_badges;
use bowtie_report_core::compliance_badge;
use bowtie_report_core::display_language;
use bowtie_report_core::highlight;
use bowtie_report_core::ingest_str;
use bowtie_report_core::matrix;
use bowtie_report_core::summarize_selected;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Report argument value that selects standard input.
const STDIN_MARKER: &str = "-";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "bowtie-report", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to bowtie-report.toml or `BOWTIE_REPORT_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print derived statistics per implementation.
    Summary(SummaryCommand),
    /// Print the case-by-implementation result matrix.
    Matrix(MatrixCommand),
    /// Print badge embed snippets for one implementation.
    Badges(BadgesCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a bowtie-report configuration file.
    Validate,
}

/// Report input shared by every report command.
#[derive(Args, Debug)]
struct ReportArgs {
    /// Path to the run-record stream, or `-` for stdin.
    #[arg(long, value_name = "PATH")]
    report: PathBuf,
}

impl ReportArgs {
    /// Returns true when the report is read from stdin.
    fn is_stdin(&self) -> bool {
        self.report.as_os_str() == STDIN_MARKER
    }

    /// Returns the label used in messages and audit events.
    fn label(&self) -> String {
        self.report.display().to_string()
    }
}

/// Arguments for `summary`.
#[derive(Args, Debug)]
struct SummaryCommand {
    /// Report input.
    #[command(flatten)]
    input: ReportArgs,
    /// Restrict to implementations written in this language (repeatable).
    #[arg(long = "language", value_name = "LANG", action = ArgAction::Append)]
    languages: Vec<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    format: SummaryFormat,
}

/// Arguments for `matrix`.
#[derive(Args, Debug)]
struct MatrixCommand {
    /// Report input.
    #[command(flatten)]
    input: ReportArgs,
    /// Restrict to implementations written in this language (repeatable).
    #[arg(long = "language", value_name = "LANG", action = ArgAction::Append)]
    languages: Vec<String>,
    /// Keep only cases whose description contains this text.
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = MatrixFormat::Text)]
    format: MatrixFormat,
}

/// Arguments for `badges`.
#[derive(Args, Debug)]
struct BadgesCommand {
    /// Report input.
    #[command(flatten)]
    input: ReportArgs,
    /// Implementation identifier as declared by the run.
    #[arg(long, value_name = "ID")]
    implementation: String,
    /// Emit only the compliance badge for this dialect.
    #[arg(long, value_name = "DIALECT")]
    dialect: Option<String>,
    /// Embed format.
    #[arg(long, value_enum, default_value_t = BadgeFormat::Url)]
    format: BadgeFormat,
}

/// Output formats for `summary`.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum SummaryFormat {
    /// Human-readable text output.
    Text,
    /// JSON document output.
    Json,
    /// Markdown table output.
    Markdown,
}

/// Output formats for `matrix`.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum MatrixFormat {
    /// Human-readable text output.
    Text,
    /// JSON document output.
    Json,
}

/// Embed formats for `badges`.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum BadgeFormat {
    /// Bare badge URI.
    Url,
    /// Markdown image.
    Markdown,
    /// reStructuredText image directive.
    Rest,
    /// `AsciiDoc` image macro.
    Asciidoc,
    /// HTML image element.
    Html,
}

impl From<BadgeFormat> for EmbedFormat {
    fn from(value: BadgeFormat) -> Self {
        match value {
            BadgeFormat::Url => Self::Url,
            BadgeFormat::Markdown => Self::Markdown,
            BadgeFormat::Rest => Self::Rest,
            BadgeFormat::Asciidoc => Self::AsciiDoc,
            BadgeFormat::Html => Self::Html,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = load_config(cli.config.as_deref())?;
    match command {
        Commands::Summary(command) => command_summary(&command, &config),
        Commands::Matrix(command) => command_matrix(&command, &config),
        Commands::Badges(command) => command_badges(&command, &config),
        Commands::Config {
            command,
        } => command_config(&command, &config),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<BowtieReportConfig> {
    BowtieReportConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds the dialect catalog implied by configuration.
fn dialect_catalog(config: &BowtieReportConfig) -> CliResult<DialectCatalog> {
    config.dialect_catalog().map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand, config: &BowtieReportConfig) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => command_config_validate(config),
    }
}

/// Executes the config validation command.
fn command_config_validate(config: &BowtieReportConfig) -> CliResult<ExitCode> {
    let catalog = dialect_catalog(config)?;
    let source = config.source_path.as_ref().map_or_else(
        || t!("config.validate.defaults"),
        |path| t!("config.validate.source", path = path.display()),
    );
    let lines = [
        t!("config.validate.ok"),
        source,
        t!("config.validate.dialects", count = catalog.dialects().len()),
    ];
    write_stdout_line(&lines.join("\n"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Report Commands
// ============================================================================

/// Executes the summary command.
fn command_summary(command: &SummaryCommand, config: &BowtieReportConfig) -> CliResult<ExitCode> {
    let outcome = load_report(&command.input, "summary", config)?;
    let catalog = dialect_catalog(config)?;
    let report = &outcome.report;
    let dialect = resolve_run_dialect(report, &catalog)?;
    let filter = language_filter(&command.languages);
    let summaries = summarize_selected(report, filter.implementations(report));
    let rendered = match command.format {
        SummaryFormat::Text => render_summary_text(report, dialect, &summaries),
        SummaryFormat::Markdown => render_summary_markdown(report, dialect, &summaries),
        SummaryFormat::Json => render_summary_json(&outcome, dialect, &summaries)?,
    };
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the matrix command.
fn command_matrix(command: &MatrixCommand, config: &BowtieReportConfig) -> CliResult<ExitCode> {
    let outcome = load_report(&command.input, "matrix", config)?;
    let report = &outcome.report;
    let mut filter = language_filter(&command.languages);
    if let Some(search) = &command.search {
        filter = filter.with_search(search.as_str());
    }
    let grid = matrix(filter.implementations(report), filter.cases(report));
    let rendered = match command.format {
        MatrixFormat::Text => render_matrix_text(&grid, filter.search()),
        MatrixFormat::Json => render_matrix_json(&grid)?,
    };
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the badges command.
fn command_badges(command: &BadgesCommand, config: &BowtieReportConfig) -> CliResult<ExitCode> {
    let outcome = load_report(&command.input, "badges", config)?;
    let report = &outcome.report;
    let id = ImplementationId::new(command.implementation.as_str());
    let implementation = report
        .implementation(&id)
        .ok_or_else(|| CliError::new(t!("implementation.unknown", id = id)))?;
    let catalog = dialect_catalog(config)?;
    let site = config
        .badge_site()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let badges = match &command.dialect {
        Some(dialect) => {
            compliance_badge(implementation, &DialectId::new(dialect.as_str()), &catalog, &site)
                .map(|badge| vec![badge])
        }
        None => available_badges(implementation, &catalog, &site),
    }
    .map_err(|err| CliError::new(t!("badges.failed", id = id, error = err)))?;
    let format = EmbedFormat::from(command.format);
    let rendered: Vec<String> = badges.iter().map(|badge| format.render(badge)).collect();
    write_stdout_line(&rendered.join("\n"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Ingest Helpers
// ============================================================================

/// Reads, ingests, and audits a report stream.
///
/// Malformed records within budget are reported on stderr and tolerated.
fn load_report(
    input: &ReportArgs,
    command: &'static str,
    config: &BowtieReportConfig,
) -> CliResult<IngestOutcome> {
    let sink = sink_from_config(&config.audit).map_err(|err| {
        let path = config.audit.path.as_deref().map_or_else(String::new, |path| {
            path.display().to_string()
        });
        CliError::new(t!("audit.open_failed", path = path, error = err))
    })?;
    let source = input.label();
    let text = read_report_text(input, config.ingest.max_input_bytes)?;
    sink.record(&AuditEvent::ingest_started(&source, command, text.len()));

    let outcome = match ingest_str(&text, config.parser_limits()) {
        Ok(outcome) => outcome,
        Err(err) => {
            sink.record(&AuditEvent::ingest_failed(&source, &err));
            return Err(CliError::new(t!("ingest.failed", error = err)));
        }
    };
    for record in &outcome.malformed {
        sink.record(&AuditEvent::record_malformed(&source, record));
    }
    sink.record(&AuditEvent::ingest_completed(&source, &outcome));

    let malformed = u64::try_from(outcome.malformed_count()).unwrap_or(u64::MAX);
    if let Some(limit) = config.ingest.max_malformed_records
        && config.ingest.malformed_budget_exceeded(malformed)
    {
        return Err(CliError::new(t!(
            "ingest.malformed.budget_exceeded",
            count = malformed,
            limit = limit
        )));
    }
    if !outcome.is_clean() {
        warn_malformed(&outcome)?;
    }
    Ok(outcome)
}

/// Writes one warning per skipped record plus a missing-data summary.
fn warn_malformed(outcome: &IngestOutcome) -> CliResult<()> {
    for record in &outcome.malformed {
        write_stderr_line(&t!("ingest.malformed.entry", error = record))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    write_stderr_line(&t!(
        "ingest.malformed.summary",
        count = outcome.malformed_count(),
        records = outcome.records
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))
}

/// Reads the report stream as UTF-8 text within the input limit.
fn read_report_text(input: &ReportArgs, max_bytes: u64) -> CliResult<String> {
    let kind = t!("input.kind.report");
    let path = if input.is_stdin() { t!("input.stdin") } else { input.label() };
    let bytes = if input.is_stdin() {
        read_with_limit(std::io::stdin().lock(), max_bytes)
    } else {
        read_bytes_with_limit(&input.report, max_bytes)
    }
    .map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", kind = kind, path = path, error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path,
            size = size,
            limit = limit
        )),
    })?;
    String::from_utf8(bytes)
        .map_err(|err| CliError::new(t!("input.not_utf8", kind = kind, path = path, error = err)))
}

/// Errors returned by bounded reads.
#[derive(Debug)]
enum ReadLimitError {
    /// Read failure.
    Io(std::io::Error),
    /// Input size exceeds the configured limit.
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: u64,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    if size > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    read_with_limit(file, max_bytes)
}

/// Reads a stream to the end, failing once it exceeds `max_bytes`.
fn read_with_limit(reader: impl Read, max_bytes: u64) -> Result<Vec<u8>, ReadLimitError> {
    let mut limited = reader.take(max_bytes.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    if size > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Resolves the run's dialect, treating an uncataloged URI as fatal.
fn resolve_run_dialect<'c>(
    report: &Report,
    catalog: &'c DialectCatalog,
) -> CliResult<Option<&'c Dialect>> {
    report
        .dialect(catalog)
        .transpose()
        .map_err(|err| CliError::new(t!("dialect.unknown", error = err)))
}

/// Builds a filter selecting the given languages.
fn language_filter(languages: &[String]) -> ReportFilter {
    languages
        .iter()
        .fold(ReportFilter::new(), |filter, language| filter.with_language(language.as_str()))
}

// ============================================================================
// SECTION: Summary Rendering
// ============================================================================

/// JSON summary document.
#[derive(Serialize)]
struct SummaryDocument<'a> {
    /// Run dialect when the run named one.
    dialect: Option<&'a DialectId>,
    /// Harness version when recorded.
    bowtie_version: Option<&'a str>,
    /// Whether the completion marker was seen.
    complete: bool,
    /// Whether the run stopped early.
    did_fail_fast: Option<bool>,
    /// Declared case count.
    cases: usize,
    /// Declared test count.
    tests: usize,
    /// Non-blank records seen.
    records: u64,
    /// Records skipped as malformed.
    malformed_records: usize,
    /// Selected implementations.
    implementations: Vec<SummaryEntry<'a>>,
}

/// One implementation row of the JSON summary.
#[derive(Serialize)]
struct SummaryEntry<'a> {
    /// Implementation identifier.
    id: &'a ImplementationId,
    /// Display name.
    name: &'a str,
    /// Source language identifier.
    language: &'a str,
    /// Version string when declared.
    version: Option<&'a str>,
    /// Preferred external link.
    link: Option<&'a str>,
    /// Harness runtime details.
    runtime: RuntimeEntry<'a>,
    /// Derived counts.
    #[serde(flatten)]
    stats: ImplementationStats,
    /// Unsuccessful plus errored tests.
    failed_tests: u64,
}

/// Runtime details reported by an implementation's harness.
#[derive(Serialize)]
struct RuntimeEntry<'a> {
    /// Source repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    /// Operating system.
    #[serde(skip_serializing_if = "Option::is_none")]
    os: Option<&'a str>,
    /// Operating system version.
    #[serde(skip_serializing_if = "Option::is_none")]
    os_version: Option<&'a str>,
    /// Language runtime version.
    #[serde(skip_serializing_if = "Option::is_none")]
    language_version: Option<&'a str>,
}

impl<'a> RuntimeEntry<'a> {
    /// Borrows runtime details from implementation metadata.
    fn from_metadata(metadata: &'a ImplementationMetadata) -> Self {
        Self {
            source: metadata.source.as_deref(),
            os: metadata.os.as_deref(),
            os_version: metadata.os_version.as_deref(),
            language_version: metadata.language_version.as_deref(),
        }
    }
}

/// Describes the harness runtime, for example `Python 3.12 on linux 6.1`.
fn runtime_label(metadata: &ImplementationMetadata) -> Option<String> {
    let language = metadata.language_version.as_deref().map(|version| {
        t!(
            "summary.text.runtime.language",
            language = display_language(&metadata.language),
            version = version
        )
    });
    let os = metadata.os.as_deref().map(|os| {
        metadata.os_version.as_deref().map_or_else(
            || os.to_string(),
            |version| t!("summary.text.runtime.os", os = os, version = version),
        )
    });
    match (language, os) {
        (Some(language), Some(os)) => {
            Some(t!("summary.text.runtime.on", language = language, os = os))
        }
        (Some(label), None) | (None, Some(label)) => Some(label),
        (None, None) => None,
    }
}

/// Returns the localized run status.
fn run_status(report: &Report) -> String {
    match report.completion() {
        Some(completion) if completion.did_fail_fast => t!("run.status.failed_fast"),
        Some(_) => t!("run.status.complete"),
        None => t!("run.status.incomplete"),
    }
}

/// Returns the dialect display name or the unspecified label.
fn dialect_label(dialect: Option<&Dialect>) -> String {
    dialect.map_or_else(|| t!("dialect.unspecified"), |dialect| dialect.pretty_name.clone())
}

/// Returns the harness version or the unknown label.
fn version_label(report: &Report) -> String {
    report.run().bowtie_version.clone().unwrap_or_else(|| t!("run.version.unknown"))
}

/// Formats the summary as text lines.
fn render_summary_text(
    report: &Report,
    dialect: Option<&Dialect>,
    summaries: &[ImplementationSummary<'_>],
) -> String {
    let mut lines = vec![t!(
        "summary.text.run",
        dialect = dialect_label(dialect),
        version = version_label(report),
        cases = report.cases().len(),
        tests = report.test_count(),
        status = run_status(report)
    )];
    if summaries.is_empty() {
        lines.push(t!("summary.text.none"));
    }
    for summary in summaries {
        let implementation = summary.implementation;
        let stats = summary.stats;
        lines.push(t!(
            "summary.text.entry",
            name = implementation.name(),
            language = display_language(implementation.language()),
            id = implementation.id,
            errored_cases = stats.errored_cases,
            skipped = stats.skipped_tests,
            failed = stats.failed_tests(),
            unsuccessful = stats.unsuccessful_tests,
            errored = stats.errored_tests
        ));
        if let Some(runtime) = runtime_label(&implementation.metadata) {
            lines.push(t!("summary.text.runtime", runtime = runtime));
        }
        if let Some(source) = implementation.metadata.source.as_deref() {
            lines.push(t!("summary.text.source", source = source));
        }
    }
    lines.join("\n")
}

/// Formats the summary as a markdown document.
fn render_summary_markdown(
    report: &Report,
    dialect: Option<&Dialect>,
    summaries: &[ImplementationSummary<'_>],
) -> String {
    let mut lines = vec![
        t!("summary.md.header"),
        String::new(),
        t!("summary.md.dialect", dialect = dialect_label(dialect)),
        t!("summary.md.version", version = version_label(report)),
        t!("summary.md.cases", cases = report.cases().len(), tests = report.test_count()),
        t!("summary.md.status", status = run_status(report)),
        String::new(),
    ];
    if summaries.is_empty() {
        lines.push(t!("summary.md.none"));
        return lines.join("\n");
    }
    lines.push(t!("summary.md.table_header"));
    lines.push(t!("summary.md.table_rule"));
    for summary in summaries {
        let implementation = summary.implementation;
        let stats = summary.stats;
        let name = implementation.metadata.link().map_or_else(
            || implementation.name().to_string(),
            |link| format!("[{}]({link})", implementation.name()),
        );
        lines.push(t!(
            "summary.md.table_row",
            name = name,
            language = display_language(implementation.language()),
            errored_cases = stats.errored_cases,
            skipped = stats.skipped_tests,
            failed = stats.failed_tests(),
            errored = stats.errored_tests
        ));
    }
    lines.join("\n")
}

/// Formats the summary as a JSON document.
fn render_summary_json(
    outcome: &IngestOutcome,
    dialect: Option<&Dialect>,
    summaries: &[ImplementationSummary<'_>],
) -> CliResult<String> {
    let report = &outcome.report;
    let document = SummaryDocument {
        dialect: dialect.map(|dialect| &dialect.id),
        bowtie_version: report.run().bowtie_version.as_deref(),
        complete: report.is_complete(),
        did_fail_fast: report.completion().map(|completion| completion.did_fail_fast),
        cases: report.cases().len(),
        tests: report.test_count(),
        records: outcome.records,
        malformed_records: outcome.malformed_count(),
        implementations: summaries
            .iter()
            .map(|summary| SummaryEntry {
                id: &summary.implementation.id,
                name: summary.implementation.name(),
                language: summary.implementation.language(),
                version: summary.implementation.metadata.version.as_deref(),
                link: summary.implementation.metadata.link(),
                runtime: RuntimeEntry::from_metadata(&summary.implementation.metadata),
                stats: summary.stats,
                failed_tests: summary.stats.failed_tests(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|err| CliError::new(t!("output.serialize_failed", kind = "summary", error = err)))
}

// ============================================================================
// SECTION: Matrix Rendering
// ============================================================================

/// JSON matrix document.
#[derive(Serialize)]
struct MatrixDocument<'a> {
    /// Column order.
    implementations: Vec<&'a ImplementationId>,
    /// One entry per selected case.
    cases: Vec<MatrixCaseEntry<'a>>,
}

/// One case of the JSON matrix.
#[derive(Serialize)]
struct MatrixCaseEntry<'a> {
    /// Case sequence number.
    seq: u64,
    /// Case description.
    description: &'a str,
    /// Test descriptions in order.
    tests: Vec<&'a str>,
    /// Default-filled results per column.
    results: Vec<MatrixCell<'a>>,
}

/// One cell of the JSON matrix.
#[derive(Serialize)]
struct MatrixCell<'a> {
    /// Column implementation.
    implementation: &'a ImplementationId,
    /// Per-test results.
    results: &'a [CaseResult],
}

/// Returns the short localized label of a result.
fn cell_label(result: Option<&CaseResult>) -> String {
    match result.map_or(CellOutcome::NoVerdict, CaseResult::outcome) {
        CellOutcome::Correct => t!("matrix.cell.correct"),
        CellOutcome::Incorrect => t!("matrix.cell.incorrect"),
        CellOutcome::NoVerdict
            if result.is_some_and(|result| result.state() == ResultState::Skipped) =>
        {
            t!("matrix.cell.skipped")
        }
        CellOutcome::NoVerdict => t!("matrix.cell.errored"),
    }
}

/// Wraps search matches in asterisks.
fn highlighted(text: &str, search: Option<&str>) -> String {
    let Some(search) = search else {
        return text.to_string();
    };
    highlight(text, search)
        .iter()
        .map(|segment| {
            if segment.matched {
                format!("*{}*", segment.text)
            } else {
                segment.text.to_string()
            }
        })
        .collect()
}

/// Formats the matrix as text lines.
fn render_matrix_text(grid: &CaseMatrix<'_>, search: Option<&str>) -> String {
    let columns: Vec<&str> =
        grid.implementations.iter().map(|implementation| implementation.name()).collect();
    let mut lines = vec![t!("matrix.text.columns", columns = columns.join(" | "))];
    if grid.rows.is_empty() {
        lines.push(t!("matrix.text.none"));
    }
    for row in &grid.rows {
        lines.push(t!(
            "matrix.text.case",
            seq = row.case.seq,
            description = highlighted(&row.case.description, search)
        ));
        for (index, test) in row.case.tests.iter().enumerate() {
            let cells: Vec<String> =
                row.cells.iter().map(|cell| cell_label(cell.get(index))).collect();
            lines.push(t!(
                "matrix.text.test",
                index = index + 1,
                description = test.description,
                cells = cells.join(" | ")
            ));
        }
    }
    lines.push(t!("matrix.text.legend"));
    lines.join("\n")
}

/// Formats the matrix as a JSON document.
fn render_matrix_json(grid: &CaseMatrix<'_>) -> CliResult<String> {
    let document = MatrixDocument {
        implementations: grid
            .implementations
            .iter()
            .map(|implementation| &implementation.id)
            .collect(),
        cases: grid
            .rows
            .iter()
            .map(|row| MatrixCaseEntry {
                seq: row.case.seq.get(),
                description: &row.case.description,
                tests: row.case.tests.iter().map(|test| test.description.as_str()).collect(),
                results: grid
                    .implementations
                    .iter()
                    .zip(&row.cells)
                    .map(|(implementation, cell)| MatrixCell {
                        implementation: &implementation.id,
                        results: cell,
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|err| CliError::new(t!("output.serialize_failed", kind = "matrix", error = err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
