use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// Workbook cannot be opened or read.
    Workbook(String),
    /// The configured worksheet does not exist.
    SheetNotFound(String),
    /// A required column header is absent from the input.
    MissingColumn { source: String, column: String },
    /// CSV parse error.
    Csv(String),
    /// Filesystem error (create dir, write, etc.).
    Io(String),
    /// JSON serialization error.
    Json(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::SheetNotFound(sheet) => write!(f, "worksheet '{sheet}' not found"),
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}
