//! `ledgerlink sync` / `ledgerlink check` — the reconciliation pipeline.
//!
//! Pipeline order: read workbook → fetch remote accounts → reconcile →
//! push additions → assemble → persist. Any step failure before persistence
//! is caught once, converted to an error-status payload, and the report is
//! still written, so downstream consumers detect failed runs by `status`
//! rather than by a missing file.

use std::path::PathBuf;

use ledgerlink_io::{persist, read_accounts, read_accounts_csv, WorkbookSource};
use ledgerlink_qbo::{load_credentials, QboClient};
use ledgerlink_recon::report::{assemble, failure};
use ledgerlink_recon::{count_matched, reconcile, Account};

use crate::config::{LocalFormat, SyncConfig};
use crate::exit_codes::{
    qbo_exit_code, source_exit_code, EXIT_CHECK_DIFFS, EXIT_REPORT_WRITE, EXIT_SYNC_FAILED,
};
use crate::CliError;

// ── Flag/config resolution ──────────────────────────────────────────

/// Raw command-line inputs shared by `sync` and `check`.
#[derive(Debug, Default)]
pub struct SyncFlags {
    pub config: Option<PathBuf>,
    pub workbook: Option<PathBuf>,
    pub sheet: Option<String>,
    pub format: Option<LocalFormat>,
    pub credentials: Option<PathBuf>,
    pub sandbox: bool,
    pub output: Option<PathBuf>,
}

/// Effective settings after merging flags over the optional config file.
/// Flags always win; nothing is defaulted from the environment.
#[derive(Debug)]
struct Settings {
    workbook: PathBuf,
    sheet: Option<String>,
    format: LocalFormat,
    credentials: PathBuf,
    sandbox: bool,
    output: Option<PathBuf>,
}

fn expand(path: PathBuf) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}

fn resolve(flags: SyncFlags) -> Result<Settings, CliError> {
    let config = match &flags.config {
        Some(path) => {
            let config_str = std::fs::read_to_string(path).map_err(|e| {
                CliError::usage(format!("cannot read config {}: {e}", path.display()))
            })?;
            Some(SyncConfig::from_toml(&config_str).map_err(|e| {
                CliError::usage(format!("invalid config {}: {e}", path.display()))
            })?)
        }
        None => None,
    };

    let workbook = flags
        .workbook
        .or_else(|| config.as_ref().map(|c| c.workbook.path.clone()))
        .ok_or_else(|| {
            CliError::usage("missing workbook path")
                .with_hint("use --workbook or set [workbook].path in the config file")
        })?;

    let credentials = flags
        .credentials
        .or_else(|| config.as_ref().map(|c| c.qbo.credentials.clone()))
        .ok_or_else(|| {
            CliError::usage("missing QBO credentials path")
                .with_hint("use --credentials or set [qbo].credentials in the config file")
        })?;

    let sheet = flags
        .sheet
        .or_else(|| config.as_ref().and_then(|c| c.workbook.sheet.clone()));

    let workbook = expand(workbook);

    let format = flags
        .format
        .or_else(|| config.as_ref().and_then(|c| c.workbook.format))
        .unwrap_or_else(|| {
            match workbook.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("csv") => LocalFormat::Csv,
                _ => LocalFormat::Xlsx,
            }
        });

    let sandbox = flags.sandbox || config.as_ref().map(|c| c.qbo.sandbox).unwrap_or(false);

    let output = flags
        .output
        .or_else(|| config.as_ref().and_then(|c| c.report.output.clone()))
        .map(expand);

    Ok(Settings {
        workbook,
        sheet,
        format,
        credentials: expand(credentials),
        sandbox,
        output,
    })
}

// ── Pipeline steps ──────────────────────────────────────────────────

fn load_local(settings: &Settings) -> Result<Vec<Account>, CliError> {
    match settings.format {
        LocalFormat::Csv => {
            let data = std::fs::read_to_string(&settings.workbook).map_err(|e| CliError {
                code: crate::exit_codes::EXIT_SOURCE_READ,
                message: format!("cannot read {}: {e}", settings.workbook.display()),
                hint: None,
            })?;
            read_accounts_csv(&data).map_err(|e| CliError {
                code: source_exit_code(&e),
                message: e.to_string(),
                hint: None,
            })
        }
        LocalFormat::Xlsx => {
            let mut source = WorkbookSource::new(&settings.workbook);
            if let Some(ref sheet) = settings.sheet {
                source = source.with_sheet(sheet);
            }
            read_accounts(&source).map_err(|e| CliError {
                code: source_exit_code(&e),
                message: e.to_string(),
                hint: None,
            })
        }
    }
}

fn connect(settings: &Settings) -> Result<QboClient, CliError> {
    let creds = load_credentials(&settings.credentials).map_err(|e| CliError {
        code: qbo_exit_code(&e),
        message: e.to_string(),
        hint: Some("create the credentials JSON via your Intuit OAuth app".into()),
    })?;
    Ok(QboClient::from_credentials(
        creds,
        settings.credentials.clone(),
        settings.sandbox,
    ))
}

fn qbo_err(e: ledgerlink_qbo::QboError) -> CliError {
    CliError {
        code: qbo_exit_code(&e),
        message: e.to_string(),
        hint: None,
    }
}

// ── sync ────────────────────────────────────────────────────────────

pub fn cmd_sync(flags: SyncFlags, dry_run: bool, quiet: bool) -> Result<(), CliError> {
    let settings = resolve(flags)?;
    let output = settings.output.clone().ok_or_else(|| {
        CliError::usage("missing report output path")
            .with_hint("use --output or set [report].output in the config file")
    })?;

    let payload = match run_pipeline(&settings, dry_run, quiet) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("error: {}", e.message);
            failure(e.message)
        }
    };

    persist(&payload, &output).map_err(|e| CliError {
        code: EXIT_REPORT_WRITE,
        message: e.to_string(),
        hint: None,
    })?;

    if !quiet {
        eprintln!("report written to {}", output.display());
    }

    if payload.succeeded() {
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_SYNC_FAILED,
            message: String::new(), // already printed; the report has the details
            hint: None,
        })
    }
}

fn run_pipeline(
    settings: &Settings,
    dry_run: bool,
    quiet: bool,
) -> Result<ledgerlink_recon::ReportPayload, CliError> {
    let local = load_local(settings)?;
    if !quiet {
        eprintln!(
            "read {} local accounts from {}",
            local.len(),
            settings.workbook.display(),
        );
    }

    let mut client = connect(settings)?;
    let remote = client.fetch_accounts().map_err(qbo_err)?;
    if !quiet {
        eprintln!("fetched {} remote accounts", remote.len());
    }

    let report = reconcile(&local, &remote);
    let matched = count_matched(&local, &remote);

    let applied = if dry_run {
        if !quiet && !report.additions.is_empty() {
            eprintln!("dry-run: skipping {} additions", report.additions.len());
        }
        Vec::new()
    } else {
        client.create_accounts(&report.additions).map_err(qbo_err)?
    };

    if !quiet {
        eprintln!(
            "sync: {} additions applied / {} detected, {} conflicts, {} remote-only, {} matched",
            applied.len(),
            report.additions.len(),
            report.conflicts.len(),
            report.remote_only.len(),
            matched,
        );
    }

    Ok(assemble(&report, &applied, matched))
}

// ── check ───────────────────────────────────────────────────────────

/// Reconcile without pushing anything or writing a report file.
pub fn cmd_check(flags: SyncFlags, json: bool) -> Result<(), CliError> {
    let settings = resolve(flags)?;

    let local = load_local(&settings)?;
    let mut client = connect(&settings)?;
    let remote = client.fetch_accounts().map_err(qbo_err)?;

    let report = reconcile(&local, &remote);
    let matched = count_matched(&local, &remote);

    if json {
        let dump = serde_json::json!({
            "additions": &report.additions,
            "remote_only": &report.remote_only,
            "conflicts": &report.conflicts,
            "matched_count": matched,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&dump)
                .map_err(|e| CliError::usage(format!("JSON serialization error: {e}")))?,
        );
    }

    eprintln!(
        "check: {} additions pending, {} conflicts, {} remote-only, {} matched",
        report.additions.len(),
        report.conflicts.len(),
        report.remote_only.len(),
        matched,
    );

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_CHECK_DIFFS,
            message: String::new(), // summary already printed
            hint: None,
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_USAGE;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("sync.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn flags_alone_resolve() {
        let settings = resolve(SyncFlags {
            workbook: Some("chart.xlsx".into()),
            credentials: Some("qbo.json".into()),
            output: Some("report.json".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(settings.workbook, PathBuf::from("chart.xlsx"));
        assert_eq!(settings.format, LocalFormat::Xlsx);
        assert!(!settings.sandbox);
        assert_eq!(settings.output, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn config_fills_in_missing_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            &dir,
            r#"
[workbook]
path = "chart.xlsx"
sheet = "accounts"

[qbo]
credentials = "qbo.json"
sandbox = true

[report]
output = "reports/sync.json"
"#,
        );

        let settings = resolve(SyncFlags {
            config: Some(config),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(settings.sheet.as_deref(), Some("accounts"));
        assert!(settings.sandbox);
        assert_eq!(settings.output, Some(PathBuf::from("reports/sync.json")));
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            &dir,
            r#"
[workbook]
path = "from_config.xlsx"

[qbo]
credentials = "config_qbo.json"
"#,
        );

        let settings = resolve(SyncFlags {
            config: Some(config),
            workbook: Some("from_flag.csv".into()),
            credentials: Some("flag_qbo.json".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(settings.workbook, PathBuf::from("from_flag.csv"));
        assert_eq!(settings.credentials, PathBuf::from("flag_qbo.json"));
        // Format inferred from the winning flag's extension
        assert_eq!(settings.format, LocalFormat::Csv);
    }

    #[test]
    fn explicit_format_beats_extension() {
        let settings = resolve(SyncFlags {
            workbook: Some("export.csv".into()),
            credentials: Some("qbo.json".into()),
            format: Some(LocalFormat::Xlsx),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.format, LocalFormat::Xlsx);
    }

    #[test]
    fn missing_workbook_is_usage_error() {
        let err = resolve(SyncFlags {
            credentials: Some("qbo.json".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.message.contains("workbook"));
        assert!(err.hint.is_some());
    }

    #[test]
    fn missing_credentials_is_usage_error() {
        let err = resolve(SyncFlags {
            workbook: Some("chart.xlsx".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.message.contains("credentials"));
    }

    #[test]
    fn bad_config_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, "not toml at all [[[");
        let err = resolve(SyncFlags {
            config: Some(config),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.message.contains("invalid config"));
    }

    #[test]
    fn missing_output_rejected_by_sync_only() {
        // resolve() itself tolerates a missing output; cmd_sync requires it.
        let settings = resolve(SyncFlags {
            workbook: Some("chart.xlsx".into()),
            credentials: Some("qbo.json".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(settings.output.is_none());

        let err = cmd_sync(
            SyncFlags {
                workbook: Some("chart.xlsx".into()),
                credentials: Some("qbo.json".into()),
                ..Default::default()
            },
            true,
            true,
        )
        .unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.message.contains("output"));
    }
}
