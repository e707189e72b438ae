//! `ledgerlink-recon` — chart-of-accounts reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded account records, returns a
//! classified reconciliation report. No CLI or IO dependencies.

pub mod engine;
pub mod model;
pub mod report;

pub use engine::{count_matched, reconcile};
pub use model::{Account, Conflict, ConflictReason, Origin, ReconReport};
pub use report::{assemble, ReportPayload, RunStatus};
