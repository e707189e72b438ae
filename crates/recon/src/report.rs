use serde::Serialize;

use crate::model::{Account, Conflict, ReconReport};

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Error,
}

/// Flat, serializable outcome of one sync run. This is the exact schema
/// written to the report file; downstream consumers detect failed runs by
/// inspecting `status`, not by the file's absence.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub status: RunStatus,
    pub generated_at: String,
    /// Records confirmed created in the remote system. Not the locally
    /// detected additions, which may be a superset when the remote rejects
    /// individual records.
    pub additions: Vec<Account>,
    pub conflicts: Vec<Conflict>,
    pub matched_count: usize,
    pub error: Option<String>,
}

impl ReportPayload {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Success
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the report payload for a completed run.
///
/// `conflicts` is the concatenation of the run's data-mismatch conflicts and
/// one synthetic missing-in-local conflict per remote-only record.
pub fn assemble(report: &ReconReport, applied: &[Account], matched_count: usize) -> ReportPayload {
    let mut conflicts = report.conflicts.clone();
    conflicts.extend(report.remote_only.iter().map(Conflict::missing_in_local));

    ReportPayload {
        status: RunStatus::Success,
        generated_at: chrono::Utc::now().to_rfc3339(),
        additions: applied.to_vec(),
        conflicts,
        matched_count,
        error: None,
    }
}

/// Payload for a run that failed before a report could be assembled. Still
/// persisted, so a failed run leaves a readable trace.
pub fn failure(message: impl Into<String>) -> ReportPayload {
    ReportPayload {
        status: RunStatus::Error,
        generated_at: chrono::Utc::now().to_rfc3339(),
        additions: Vec::new(),
        conflicts: Vec::new(),
        matched_count: 0,
        error: Some(message.into()),
    }
}
