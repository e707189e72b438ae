//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, bad config)   |
//! | 10-19   | source           | Local workbook/CSV ingestion             |
//! | 20-29   | qbo              | QuickBooks Online connector              |
//! | 30-39   | sync             | Pipeline outcome and report persistence  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use ledgerlink_io::IoError;
use ledgerlink_qbo::QboError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options, invalid config.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Source (10-19) — local workbook/CSV ingestion
// =============================================================================

/// Workbook or CSV input cannot be opened, parsed, or lacks a required
/// column/worksheet.
pub const EXIT_SOURCE_READ: u8 = 10;

// =============================================================================
// QBO (20-29) — QuickBooks Online connector
// =============================================================================

/// No usable credentials (missing file, invalid JSON).
pub const EXIT_QBO_NOT_AUTH: u8 = 20;

/// Auth rejected by upstream (401/403), including failed token refresh.
pub const EXIT_QBO_AUTH: u8 = 21;

/// Request rejected by upstream as invalid (400).
pub const EXIT_QBO_VALIDATION: u8 = 22;

/// Rate limited after retries (429).
pub const EXIT_QBO_RATE_LIMIT: u8 = 23;

/// Upstream error (5xx), network failure, or unparseable response.
pub const EXIT_QBO_UPSTREAM: u8 = 24;

// =============================================================================
// Sync (30-39) — pipeline outcome
// =============================================================================

/// The sync pipeline failed; an error-status report was still written.
pub const EXIT_SYNC_FAILED: u8 = 30;

/// The report file itself could not be written.
pub const EXIT_REPORT_WRITE: u8 = 31;

/// `check` found work to do (additions, conflicts, or remote-only records).
/// Like `diff(1)`, a nonzero exit means "the sources differ."
pub const EXIT_CHECK_DIFFS: u8 = 32;

// =============================================================================
// Error mapping
// =============================================================================

/// Map a local-source error to its exit code.
pub fn source_exit_code(_err: &IoError) -> u8 {
    EXIT_SOURCE_READ
}

/// Map a QBO error to its exit code.
pub fn qbo_exit_code(err: &QboError) -> u8 {
    match err {
        QboError::NotAuthenticated(_) => EXIT_QBO_NOT_AUTH,
        QboError::Auth(_) => EXIT_QBO_AUTH,
        QboError::Validation(_) => EXIT_QBO_VALIDATION,
        QboError::RateLimited(_) => EXIT_QBO_RATE_LIMIT,
        QboError::Upstream(_) | QboError::Parse(_) | QboError::Io(_) => EXIT_QBO_UPSTREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qbo_errors_map_to_their_range() {
        assert_eq!(qbo_exit_code(&QboError::NotAuthenticated("x".into())), 20);
        assert_eq!(qbo_exit_code(&QboError::Auth("x".into())), 21);
        assert_eq!(qbo_exit_code(&QboError::Validation("x".into())), 22);
        assert_eq!(qbo_exit_code(&QboError::RateLimited("x".into())), 23);
        assert_eq!(qbo_exit_code(&QboError::Upstream("x".into())), 24);
        assert_eq!(qbo_exit_code(&QboError::Parse("x".into())), 24);
    }

    #[test]
    fn source_errors_map_to_their_range() {
        assert_eq!(source_exit_code(&IoError::SheetNotFound("s".into())), 10);
        assert_eq!(source_exit_code(&IoError::Csv("bad".into())), 10);
    }
}
