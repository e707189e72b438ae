//! CSV ingestion for workbooks already exported to CSV.

use ledgerlink_recon::{Account, Origin};

use crate::error::IoError;

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, IoError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| IoError::MissingColumn {
            source: "CSV input".to_string(),
            column: name.to_string(),
        })
}

/// Read local chart-of-accounts records from CSV data. Same column contract
/// as the workbook reader: `id`, `number`, `name`, `type` headers in any
/// order, rows without an id or a name skipped.
pub fn read_accounts_csv(csv_data: &str) -> Result<Vec<Account>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IoError::Csv(e.to_string()))?
        .clone();

    let id_idx = find_column(&headers, "id")?;
    let number_idx = find_column(&headers, "number")?;
    let name_idx = find_column(&headers, "name")?;
    let type_idx = find_column(&headers, "type")?;

    let field = |record: &csv::StringRecord, idx: usize| {
        record.get(idx).map(|v| v.trim().to_string()).unwrap_or_default()
    };

    let mut accounts = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::Csv(e.to_string()))?;
        let id = field(&record, id_idx);
        let name = field(&record, name_idx);
        if id.is_empty() || name.is_empty() {
            continue;
        }
        accounts.push(Account {
            account_type: field(&record, type_idx),
            number: field(&record, number_idx),
            name,
            id,
            origin: Origin::Local,
        });
    }

    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_order() {
        let data = "\
id,number,name,type
1,1000,Checking,ASSET
2,2000,Office Supplies,EXPENSE
";
        let accounts = read_accounts_csv(data).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id, "1");
        assert_eq!(accounts[1].name, "Office Supplies");
        assert_eq!(accounts[1].origin, Origin::Local);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let data = "\
Name,ID,Type,Number
Checking,1,ASSET,1000
";
        let accounts = read_accounts_csv(data).unwrap();
        assert_eq!(accounts[0].id, "1");
        assert_eq!(accounts[0].number, "1000");
    }

    #[test]
    fn skips_rows_without_id_or_name() {
        let data = "\
id,number,name,type
1,1000,Checking,ASSET
,2000,Orphan,EXPENSE
3,3000,,EXPENSE
";
        let accounts = read_accounts_csv(data).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, "1");
    }

    #[test]
    fn missing_column_is_an_error() {
        let data = "id,name,type\n1,Checking,ASSET\n";
        let err = read_accounts_csv(data).unwrap_err();
        match err {
            IoError::MissingColumn { column, .. } => assert_eq!(column, "number"),
            other => panic!("expected MissingColumn, got {other}"),
        }
    }

    #[test]
    fn empty_data_yields_empty_collection() {
        let data = "id,number,name,type\n";
        assert!(read_accounts_csv(data).unwrap().is_empty());
    }
}
