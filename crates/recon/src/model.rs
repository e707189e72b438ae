use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which record set an account was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Local,
    Remote,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// One chart-of-accounts entry as seen by one source.
///
/// `id` is unique within its own source's collection; it is not guaranteed
/// to be stable across sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "type")]
    pub account_type: String,
    pub number: String,
    pub name: String,
    pub id: String,
    pub origin: Origin,
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    DataMismatch,
    OnlyInLocal,
    MissingInLocal,
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataMismatch => write!(f, "data_mismatch"),
            Self::OnlyInLocal => write!(f, "only_in_local"),
            Self::MissingInLocal => write!(f, "missing_in_local"),
        }
    }
}

/// A discrepancy between a local and a remote account, or a one-sided record
/// needing attention.
///
/// `id` is the shared identifier when both sides matched by id, and `None`
/// when the conflict is synthesized for a one-sided record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub id: Option<String>,
    pub local_type: Option<String>,
    pub remote_type: Option<String>,
    pub local_name: Option<String>,
    pub remote_name: Option<String>,
    pub local_number: Option<String>,
    pub remote_number: Option<String>,
    pub reason: ConflictReason,
}

impl Conflict {
    /// Conflict for an id present on both sides with differing fields.
    pub fn data_mismatch(local: &Account, remote: &Account) -> Self {
        Self {
            id: Some(local.id.clone()),
            local_type: Some(local.account_type.clone()),
            remote_type: Some(remote.account_type.clone()),
            local_name: Some(local.name.clone()),
            remote_name: Some(remote.name.clone()),
            local_number: Some(local.number.clone()),
            remote_number: Some(remote.number.clone()),
            reason: ConflictReason::DataMismatch,
        }
    }

    /// Synthetic conflict for a record present only in the remote system.
    pub fn missing_in_local(remote: &Account) -> Self {
        Self {
            id: None,
            local_type: None,
            remote_type: Some(remote.account_type.clone()),
            local_name: None,
            remote_name: Some(remote.name.clone()),
            local_number: None,
            remote_number: Some(remote.number.clone()),
            reason: ConflictReason::MissingInLocal,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result of one reconciliation run. Created fresh per run, never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconReport {
    /// Present only locally; eligible to be created in the remote system.
    pub additions: Vec<Account>,
    /// Present only in the remote system.
    pub remote_only: Vec<Account>,
    /// Id-matched pairs whose fields differ.
    pub conflicts: Vec<Conflict>,
}

impl ReconReport {
    pub fn is_clean(&self) -> bool {
        self.additions.is_empty() && self.remote_only.is_empty() && self.conflicts.is_empty()
    }
}
