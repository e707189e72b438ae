use ledgerlink_recon::{
    assemble, count_matched, reconcile, Account, ConflictReason, Origin, RunStatus,
};

fn local(id: &str, number: &str, name: &str, account_type: &str) -> Account {
    Account {
        account_type: account_type.into(),
        number: number.into(),
        name: name.into(),
        id: id.into(),
        origin: Origin::Local,
    }
}

fn remote(id: &str, number: &str, name: &str, account_type: &str) -> Account {
    Account {
        account_type: account_type.into(),
        number: number.into(),
        name: name.into(),
        id: id.into(),
        origin: Origin::Remote,
    }
}

#[test]
fn reconcile_then_assemble_end_to_end() {
    let ours = vec![
        local("1", "1000", "Asset", "ASSET"),
        local("2", "2000", "Expense", "EXPENSE"),
        local("3", "3000", "Income", "INCOME"),
    ];
    let theirs = vec![
        remote("2", "2000", "Expenses", "EXPENSE"),
        remote("3", "3000", "Income", "INCOME"),
        remote("4", "4000", "Liability", "LIABILITY"),
    ];

    let report = reconcile(&ours, &theirs);
    assert_eq!(report.additions.len(), 1);
    assert_eq!(report.additions[0].id, "1");
    assert_eq!(report.remote_only.len(), 1);
    assert_eq!(report.conflicts.len(), 1);

    let matched = count_matched(&ours, &theirs);
    assert_eq!(matched, 1); // id 3 agrees on all fields

    // Pretend the remote accepted the single addition and handed back its
    // own view of the record.
    let applied = vec![remote("remote-101", "1000", "Asset", "ASSET")];
    let payload = assemble(&report, &applied, matched);

    assert_eq!(payload.status, RunStatus::Success);
    assert_eq!(payload.additions.len(), 1);
    assert_eq!(payload.additions[0].id, "remote-101");
    assert_eq!(payload.matched_count, 1);

    // data_mismatch for id 2, then missing_in_local for id 4
    assert_eq!(payload.conflicts.len(), 2);
    assert_eq!(payload.conflicts[0].reason, ConflictReason::DataMismatch);
    assert_eq!(payload.conflicts[0].id.as_deref(), Some("2"));
    assert_eq!(payload.conflicts[1].reason, ConflictReason::MissingInLocal);
    assert_eq!(payload.conflicts[1].id, None);

    let json = serde_json::to_string_pretty(&payload).unwrap();
    assert!(json.contains("\"status\": \"success\""));
    assert!(json.contains("\"reason\": \"data_mismatch\""));
}
