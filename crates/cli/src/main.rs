// Concord CLI - compare two reviewer tables and score where they disagree

mod exit_codes;
mod logging;
mod schema_source;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use serde::Serialize;

use concord_io::{load_table, write_table, LoadError, WriteError};
use concord_recon::aggregate::Summary;
use concord_recon::{
    compare, render_report, CompareConfig, CompareOptions, ComparePlan, ComparisonMeta,
    ConcordError,
};

use exit_codes::{
    concord_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_INPUT_READ, EXIT_SUCCESS, EXIT_WRITE,
};

#[derive(Parser)]
#[command(name = "concord")]
#[command(about = "Compare two reviewer tables and score where the reviewers disagree")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Examples:
  concord reviewer1.tsv reviewer2.tsv
  concord alice.xlsx bob.xlsx -o combined.xlsx --suffix1 alice --suffix2 bob
  concord a.tsv b.tsv -j https://github.com/acme/forms/blob/main/rating.json
  concord a.tsv b.tsv --config concord.toml --json --dry-run")]
struct Cli {
    /// First reviewer table (.tsv, .xlsx, .xls, .ods)
    table1: PathBuf,

    /// Second reviewer table
    table2: PathBuf,

    /// Combined output table; .xlsx writes a workbook (.xls also gets XLSX content), anything else TSV [default: combined.tsv]
    #[arg(short = 'o', long = "output-table")]
    output_table: Option<PathBuf>,

    /// Suffix for table1 columns that collide with table2 [default: 1]
    #[arg(long, visible_alias = "s1")]
    suffix1: Option<String>,

    /// Suffix for table2 columns that collide with table1 [default: 2]
    #[arg(long, visible_alias = "s2")]
    suffix2: Option<String>,

    /// Text between a column name and its suffix [default: " "]
    #[arg(long)]
    suffix_delimiter: Option<String>,

    /// Form schema JSON (path or http(s) URL) restricting compared columns
    #[arg(short = 'j', long = "form-schema-json")]
    form_schema_json: Option<String>,

    /// Identifier column shared by both tables [default: Path]
    #[arg(long)]
    id_column: Option<String>,

    /// Confidence value counted as high confidence [default: high]
    #[arg(long)]
    high_confidence: Option<String>,

    /// TOML config file; command-line flags override its values
    #[arg(short = 'c', long, env = "CONCORD_CONFIG")]
    config: Option<PathBuf>,

    /// Print the report without writing the output table
    #[arg(long)]
    dry_run: bool,

    /// Print the summary as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// More diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only errors on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  concord-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ConcordError> for CliError {
    fn from(err: ConcordError) -> Self {
        let code = concord_exit_code(&err);
        let mut message = err.to_string();
        for line in err.details() {
            message.push_str("\n       ");
            message.push_str(&line);
        }

        let hint = match &err {
            ConcordError::MissingIdentifierColumn { .. } => {
                Some("use --id-column to name the identifier column")
            }
            ConcordError::NoOverlap { .. } => {
                Some("both tables must list the same items; check --id-column")
            }
            ConcordError::NoColumnsToCompare { schema: Some(_), .. } => {
                Some("the form schema's columnName entries must match the table headers")
            }
            _ => None,
        };

        CliError { code, message, hint: hint.map(str::to_string) }
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Table(e) => e.into(),
            other => CliError::new(EXIT_INPUT_READ, other.to_string()),
        }
    }
}

impl From<WriteError> for CliError {
    fn from(err: WriteError) -> Self {
        CliError::new(EXIT_WRITE, err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonReport<'a> {
    meta: &'a ComparisonMeta,
    plan: &'a ComparePlan,
    summary: &'a Summary,
    discordant_rows: usize,
    /// `None` on --dry-run.
    output: Option<String>,
    rows_written: Option<usize>,
}

fn run(cli: Cli) -> Result<(), CliError> {
    let (config, config_dir) = match &cli.config {
        Some(path) => (load_config(path)?, path.parent().map(Path::to_path_buf)),
        None => (CompareConfig::default(), None),
    };

    let options = resolve_options(&cli, &config);
    options.validate()?;

    let output = match (&cli.output_table, &config.output) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => relative_to(config_dir.as_deref(), path),
        (None, None) => PathBuf::from(config.output_path()),
    };

    let table1 = load_table(&cli.table1, &options.id_column)?;
    let table2 = load_table(&cli.table2, &options.id_column)?;

    let schema = match (&cli.form_schema_json, &config.schema) {
        (Some(source), _) => Some(schema_source::load_schema(source)?),
        (None, Some(source)) if is_url(source) => Some(schema_source::load_schema(source)?),
        (None, Some(source)) => {
            let path = relative_to(config_dir.as_deref(), source);
            Some(schema_source::load_schema(&path.to_string_lossy())?)
        }
        (None, None) => None,
    };

    let comparison = compare(&table1, &table2, &options, schema.as_ref())?;

    let rows_written = if cli.dry_run {
        tracing::info!("dry run, output table not written");
        None
    } else {
        let table = comparison.to_output_table();
        write_table(&output, &table)?;
        Some(table.len())
    };

    if cli.json {
        let report = JsonReport {
            meta: &comparison.meta,
            plan: &comparison.plan,
            summary: &comparison.summary,
            discordant_rows: comparison.discordant_rows(),
            output: rows_written.map(|_| output.display().to_string()),
            rows_written,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", render_report(&comparison.summary));
        if let Some(n) = rows_written {
            println!("Wrote {} rows to {}", n, output.display());
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<CompareConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = CompareConfig::from_toml(&text).map_err(|e| {
        let mut err = CliError::from(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Flag > config file > built-in default.
fn resolve_options(cli: &Cli, config: &CompareConfig) -> CompareOptions {
    let mut options = config.options();
    if let Some(v) = &cli.id_column {
        options.id_column = v.clone();
    }
    if let Some(v) = &cli.suffix1 {
        options.suffix1 = v.clone();
    }
    if let Some(v) = &cli.suffix2 {
        options.suffix2 = v.clone();
    }
    if let Some(v) = &cli.suffix_delimiter {
        options.suffix_delimiter = v.clone();
    }
    if let Some(v) = &cli.high_confidence {
        options.high_confidence = v.clone();
    }
    options
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Paths in a config file are relative to the config file's directory.
fn relative_to(base: Option<&Path>, value: &str) -> PathBuf {
    let path = Path::new(value);
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}
