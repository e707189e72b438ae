//! JSON report persistence.

use std::path::Path;

use ledgerlink_recon::ReportPayload;

use crate::error::IoError;

/// Serialize the payload as pretty JSON to `path`, creating parent
/// directories as needed. The report is written for failed runs too, so
/// this is the last step of every pipeline run.
pub fn persist(payload: &ReportPayload, path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| IoError::Io(format!("cannot create {}: {e}", parent.display())))?;
        }
    }

    let json =
        serde_json::to_string_pretty(payload).map_err(|e| IoError::Json(e.to_string()))?;

    std::fs::write(path, json)
        .map_err(|e| IoError::Io(format!("cannot write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlink_recon::report::failure;

    #[test]
    fn writes_payload_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        persist(&failure("remote unreachable"), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "remote unreachable");
        assert_eq!(json["additions"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("2026").join("report.json");

        persist(&failure("boom"), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn overwrites_existing_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        persist(&failure("first"), &path).unwrap();
        persist(&failure("second"), &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["error"], "second");
    }
}
