//! XLSX workbook ingestion via calamine.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};

use ledgerlink_recon::{Account, Origin};

use crate::error::IoError;

/// Worksheet holding the chart of accounts unless configured otherwise.
pub const DEFAULT_SHEET: &str = "chartofaccount";

/// Required column headers, matched case-insensitively against row 1.
const REQUIRED_COLUMNS: [&str; 4] = ["id", "number", "name", "type"];

#[derive(Debug, Clone)]
pub struct WorkbookSource {
    pub path: PathBuf,
    pub sheet: String,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: DEFAULT_SHEET.to_string(),
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }
}

/// Render a cell as text. Whole-number floats drop the spurious `.0` that
/// spreadsheet engines attach to numeric id/number cells.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        other => other.to_string(),
    }
}

fn find_column(headers: &[Data], sheet: &str, name: &str) -> Result<usize, IoError> {
    headers
        .iter()
        .position(|h| cell_to_string(h).eq_ignore_ascii_case(name))
        .ok_or_else(|| IoError::MissingColumn {
            source: format!("worksheet '{sheet}'"),
            column: name.to_string(),
        })
}

/// Read local chart-of-accounts records from a workbook.
///
/// Row 1 must carry the `id`, `number`, `name` and `type` headers in any
/// order. Rows missing an id or a name are skipped rather than failing the
/// read; everything readable is returned or the whole call errors.
pub fn read_accounts(source: &WorkbookSource) -> Result<Vec<Account>, IoError> {
    read_accounts_from(&source.path, &source.sheet)
}

fn read_accounts_from(path: &Path, sheet: &str) -> Result<Vec<Account>, IoError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IoError::Workbook(format!("cannot open {}: {e}", path.display())))?;

    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(IoError::SheetNotFound(sheet.to_string()));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| IoError::Workbook(format!("cannot read worksheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row,
        None => return Ok(Vec::new()),
    };

    let id_idx = find_column(headers, sheet, REQUIRED_COLUMNS[0])?;
    let number_idx = find_column(headers, sheet, REQUIRED_COLUMNS[1])?;
    let name_idx = find_column(headers, sheet, REQUIRED_COLUMNS[2])?;
    let type_idx = find_column(headers, sheet, REQUIRED_COLUMNS[3])?;

    let cell = |row: &[Data], idx: usize| row.get(idx).map(cell_to_string).unwrap_or_default();

    let mut accounts = Vec::new();
    for row in rows {
        let id = cell(row, id_idx);
        let name = cell(row, name_idx);
        // Incomplete rows (trailing blanks, subtotal lines) are skipped.
        if id.is_empty() || name.is_empty() {
            continue;
        }
        accounts.push(Account {
            account_type: cell(row, type_idx),
            number: cell(row, number_idx),
            name,
            id,
            origin: Origin::Local,
        });
    }

    Ok(accounts)
}
