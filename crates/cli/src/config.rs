//! Sync configuration. Every path is explicit — there are no baked-in
//! default locations; the config file and flags are the only sources.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    pub workbook: WorkbookConfig,
    pub qbo: QboConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkbookConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub format: Option<LocalFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LocalFormat {
    Xlsx,
    Csv,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QboConfig {
    pub credentials: PathBuf,
    #[serde(default)]
    pub sandbox: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl SyncConfig {
    pub fn from_toml(config_str: &str) -> Result<Self, String> {
        toml::from_str(config_str).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = SyncConfig::from_toml(
            r#"
[workbook]
path = "chart.xlsx"
sheet = "accounts_2026"
format = "xlsx"

[qbo]
credentials = "qbo.json"
sandbox = true

[report]
output = "reports/sync.json"
"#,
        )
        .unwrap();

        assert_eq!(config.workbook.path, PathBuf::from("chart.xlsx"));
        assert_eq!(config.workbook.sheet.as_deref(), Some("accounts_2026"));
        assert_eq!(config.workbook.format, Some(LocalFormat::Xlsx));
        assert!(config.qbo.sandbox);
        assert_eq!(
            config.report.output,
            Some(PathBuf::from("reports/sync.json")),
        );
    }

    #[test]
    fn parses_minimal_config() {
        let config = SyncConfig::from_toml(
            r#"
[workbook]
path = "chart.xlsx"

[qbo]
credentials = "qbo.json"
"#,
        )
        .unwrap();

        assert!(config.workbook.sheet.is_none());
        assert!(config.workbook.format.is_none());
        assert!(!config.qbo.sandbox);
        assert!(config.report.output.is_none());
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = SyncConfig::from_toml(
            r#"
[workbook]
path = "chart.xlsx"
workshet = "typo"

[qbo]
credentials = "qbo.json"
"#,
        )
        .unwrap_err();
        assert!(err.contains("workshet"), "error should name the field: {err}");
    }

    #[test]
    fn rejects_missing_credentials() {
        let err = SyncConfig::from_toml(
            r#"
[workbook]
path = "chart.xlsx"

[qbo]
sandbox = true
"#,
        )
        .unwrap_err();
        assert!(err.contains("credentials"), "got: {err}");
    }

    #[test]
    fn rejects_bad_format_value() {
        let err = SyncConfig::from_toml(
            r#"
[workbook]
path = "chart.xlsx"
format = "ods"

[qbo]
credentials = "qbo.json"
"#,
        )
        .unwrap_err();
        assert!(err.contains("ods") || err.contains("unknown variant"), "got: {err}");
    }
}
