// citedate CLI - citation date reconciliation pipeline
// Each subcommand is one pipeline stage; `run` chains them.

mod changes;
mod clean;
mod config;
mod context;
mod convert;
mod exit_codes;
mod iso;
mod run;
mod verify;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use citedate_io::TableError;
use citedate_recon::ReconError;

use context::Context;
use exit_codes::{recon_exit_code, table_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "citedate")]
#[command(about = "Reconcile inconsistent citation dates in marriage-record tables")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Pipeline config (default: ./citedate.toml when present)
    #[arg(long, global = true, env = "CITEDATE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). CITEDATE_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print a JSON document instead of the human report
    #[arg(long, global = true)]
    json: bool,

    /// Suppress the human report (errors still print)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the messy Excel workbook to CSV
    #[command(after_help = "\
Examples:
  citedate convert
  citedate convert records.xlsx
  citedate convert records.xlsx -o messy.csv --sheet Marriages")]
    Convert {
        /// Excel file (default: files.excel from config)
        input: Option<PathBuf>,

        /// Output CSV (default: input with .csv extension, or files.messy)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Worksheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Assign every citation its majority date and write the cleaned table
    #[command(after_help = "\
Examples:
  citedate clean
  citedate clean -i messy.csv -o cleaned.csv
  citedate clean --json | jq .summary")]
    Clean {
        /// Messy CSV (default: files.messy)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Cleaned CSV (default: files.cleaned)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List citations whose dates were changed by cleaning
    #[command(after_help = "\
Examples:
  citedate changes
  citedate changes cleaned.csv --json")]
    Changes {
        /// Cleaned CSV (default: files.cleaned)
        input: Option<PathBuf>,
    },

    /// Add an ISO yyyy-mm-dd column next to the cleaned dates
    #[command(after_help = "\
Examples:
  citedate iso
  citedate iso -i cleaned.csv -o final.csv")]
    Iso {
        /// Cleaned CSV (default: files.cleaned)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Final CSV (default: files.final)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Summarize the final table: samples, ranges, corrected rows
    #[command(after_help = "\
Examples:
  citedate verify
  citedate verify final.csv --json")]
    Verify {
        /// Final CSV (default: files.final)
        input: Option<PathBuf>,
    },

    /// Run every stage in order; nothing is written unless all succeed
    #[command(after_help = "\
Examples:
  citedate run
  citedate run --from-excel
  citedate --config data/citedate.toml run -q")]
    Run {
        /// Start from the Excel workbook instead of the messy CSV
        #[arg(long)]
        from_excel: bool,

        /// Worksheet name when starting from Excel
        #[arg(long, requires = "from_excel")]
        sheet: Option<String>,
    },

    /// Inspect or validate the pipeline config
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("CITEDATE_GIT_DESCRIBE"), ")",
        "\nengine:  citedate-recon ", env!("CARGO_PKG_VERSION"),
        "\nbuild:   ", env!("CITEDATE_BUILD_PROFILE"),
        "\ntarget:  ", env!("CITEDATE_BUILD_TARGET"),
    )
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("CITEDATE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli) {
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

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let load = || Context::load(cli.config.as_deref(), cli.json, cli.quiet);

    match cli.command {
        Commands::Convert { input, output, sheet } => convert::cmd_convert(&load()?, input, output, sheet),
        Commands::Clean { input, output } => clean::cmd_clean(&load()?, input, output),
        Commands::Changes { input } => changes::cmd_changes(&load()?, input),
        Commands::Iso { input, output } => iso::cmd_iso(&load()?, input, output),
        Commands::Verify { input } => verify::cmd_verify(&load()?, input),
        Commands::Run { from_excel, sheet } => run::cmd_run(&load()?, from_excel, sheet),
        // Validating a config must not fail while loading that same config
        Commands::Config(cmd) => config::cmd_config(cmd, cli.config.as_deref(), cli.json),
    }
}

// ============================================================================
// Errors
// ============================================================================

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

    /// Write failure on stdout while printing the report.
    pub fn report(err: std::io::Error) -> Self {
        Self::new(EXIT_IO, format!("cannot write report: {err}"))
    }

    pub fn json(err: serde_json::Error) -> Self {
        Self::new(EXIT_ERROR, format!("JSON serialization error: {err}"))
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        let hint = match &err {
            TableError::NotFound { .. } => {
                Some("check the path, or set [files] in citedate.toml".to_string())
            }
            TableError::Format { .. } => Some("input must be a CSV with a header row".to_string()),
            TableError::Io { .. } => None,
        };
        Self { code: table_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumn { .. } => {
                Some("column names are set in the [columns] section of citedate.toml".to_string())
            }
            ReconError::ConsistencyViolation { .. } => {
                Some("no output was written; please report this with the input file".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

// ============================================================================
// JSON output
// ============================================================================

/// Envelope header shared by every `--json` document.
#[derive(Serialize)]
pub struct RunMeta {
    pub command: &'static str,
    pub version: &'static str,
    pub run_at: String,
}

impl RunMeta {
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            version: env!("CARGO_PKG_VERSION"),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value).map_err(CliError::json)?;
    println!("{json_str}");
    Ok(())
}
