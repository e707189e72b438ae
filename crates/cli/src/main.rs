//! `ledgerlink` — reconcile a chart-of-accounts workbook against QuickBooks
//! Online and push workbook-only accounts upstream.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod config;
mod exit_codes;
mod sync;

use config::LocalFormat;
use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use sync::SyncFlags;

#[derive(Parser)]
#[command(name = "ledgerlink")]
#[command(about = "Chart-of-accounts reconciliation between a workbook and QuickBooks Online")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile, push workbook-only accounts, and write a JSON report
    #[command(after_help = "\
Examples:
  ledgerlink sync --config sync.toml
  ledgerlink sync --workbook chart.xlsx --credentials qbo.json --output report.json
  ledgerlink sync --config sync.toml --dry-run

The report file is written even when the run fails; inspect its \"status\"
field to detect failed runs.")]
    Sync {
        /// Path to the sync TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Workbook (or CSV export) holding the chart of accounts
        #[arg(long)]
        workbook: Option<PathBuf>,

        /// Worksheet name (default: chartofaccount)
        #[arg(long)]
        sheet: Option<String>,

        /// Input format; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<LocalFormat>,

        /// QBO OAuth2 credentials JSON file
        #[arg(long)]
        credentials: Option<PathBuf>,

        /// Use the QBO sandbox environment
        #[arg(long)]
        sandbox: bool,

        /// Report output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Reconcile and report, but create nothing remotely
        #[arg(long)]
        dry_run: bool,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// Reconcile only: no remote writes, no report file
    #[command(after_help = "\
Examples:
  ledgerlink check --config sync.toml
  ledgerlink check --workbook chart.xlsx --credentials qbo.json --json

Exits 0 when the sources agree, 32 when there is work to do.")]
    Check {
        /// Path to the sync TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Workbook (or CSV export) holding the chart of accounts
        #[arg(long)]
        workbook: Option<PathBuf>,

        /// Worksheet name (default: chartofaccount)
        #[arg(long)]
        sheet: Option<String>,

        /// Input format; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<LocalFormat>,

        /// QBO OAuth2 credentials JSON file
        #[arg(long)]
        credentials: Option<PathBuf>,

        /// Use the QBO sandbox environment
        #[arg(long)]
        sandbox: bool,

        /// Dump the reconciliation result as JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync {
            config,
            workbook,
            sheet,
            format,
            credentials,
            sandbox,
            output,
            dry_run,
            quiet,
        } => sync::cmd_sync(
            SyncFlags {
                config,
                workbook,
                sheet,
                format,
                credentials,
                sandbox,
                output,
            },
            dry_run,
            quiet,
        ),
        Commands::Check {
            config,
            workbook,
            sheet,
            format,
            credentials,
            sandbox,
            json,
        } => sync::cmd_check(
            SyncFlags {
                config,
                workbook,
                sheet,
                format,
                credentials,
                sandbox,
                output: None,
            },
            json,
        ),
    };

    match result {
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
    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
