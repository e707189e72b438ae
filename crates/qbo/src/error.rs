use std::fmt;

/// Error type for QuickBooks Online operations.
#[derive(Debug)]
pub enum QboError {
    /// No usable credentials (missing file, bad JSON, empty token).
    NotAuthenticated(String),
    /// Auth rejected by upstream (401/403), including failed token refresh.
    Auth(String),
    /// Request rejected by upstream as invalid (400).
    Validation(String),
    /// Rate limited after retries (429).
    RateLimited(String),
    /// Upstream error (5xx) or network failure after retries.
    Upstream(String),
    /// Response body could not be parsed.
    Parse(String),
    /// Local file I/O error (credentials read/write).
    Io(String),
}

impl fmt::Display for QboError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated(msg) => write!(f, "not authenticated: {msg}"),
            Self::Auth(msg) => write!(f, "QBO auth failed: {msg}"),
            Self::Validation(msg) => write!(f, "QBO request rejected: {msg}"),
            Self::RateLimited(msg) => write!(f, "QBO rate limited: {msg}"),
            Self::Upstream(msg) => write!(f, "QBO upstream error: {msg}"),
            Self::Parse(msg) => write!(f, "QBO response invalid: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for QboError {}
