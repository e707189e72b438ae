//! QuickBooks Online client: fetch the remote chart of accounts, push
//! locally-detected additions.

use std::path::PathBuf;

use ledgerlink_recon::{Account, Origin};

use crate::auth::{refresh_access_token, save_credentials, QboCredentials};
use crate::error::QboError;
use crate::http::RetryClient;

// ── Constants ───────────────────────────────────────────────────────

const QBO_API_BASE: &str = "https://quickbooks.api.intuit.com";
const QBO_SANDBOX_BASE: &str = "https://sandbox-quickbooks.api.intuit.com";
const QBO_TOKEN_URL: &str = "https://oauth.platform.intuit.com/oauth2/v1/tokens/bearer";
const QBO_QUERY_LIMIT: u32 = 1000;

// ── Error extraction ────────────────────────────────────────────────

fn extract_qbo_error(body: &serde_json::Value, status: u16) -> String {
    // QBO error responses come in a Fault structure
    body["Fault"]["Error"][0]["Detail"]
        .as_str()
        .or_else(|| body["Fault"]["Error"][0]["Message"].as_str())
        .or_else(|| body["fault"]["error"][0]["detail"].as_str())
        .or_else(|| body["message"].as_str())
        .unwrap_or(&format!("HTTP {status}"))
        .to_string()
}

// ── Entity parsing ──────────────────────────────────────────────────

/// Map a QBO Account entity to our record shape. Entities without an Id or
/// a Name cannot participate in reconciliation and are skipped with a
/// warning.
fn parse_account(entity: &serde_json::Value) -> Option<Account> {
    let id = entity["Id"].as_str().unwrap_or("").to_string();
    let name = entity["Name"].as_str().unwrap_or("").to_string();

    if id.is_empty() || name.is_empty() {
        eprintln!(
            "warning: skipping QBO account with missing Id/Name: {}",
            entity,
        );
        return None;
    }

    Some(Account {
        account_type: entity["AccountType"].as_str().unwrap_or("").to_string(),
        number: entity["AcctNum"].as_str().unwrap_or("").to_string(),
        name,
        id,
        origin: Origin::Remote,
    })
}

fn account_body(account: &Account) -> serde_json::Value {
    let mut body = serde_json::json!({ "Name": account.name });
    if !account.account_type.is_empty() {
        body["AccountType"] = serde_json::Value::String(account.account_type.clone());
    }
    if !account.number.is_empty() {
        body["AcctNum"] = serde_json::Value::String(account.number.clone());
    }
    body
}

// ── Client ──────────────────────────────────────────────────────────

pub struct QboClient {
    client: RetryClient,
    access_token: String,
    realm_id: String,
    base_url: String,
    token_url: String,
    creds: Option<QboCredentials>,
    creds_path: Option<PathBuf>,
}

impl QboClient {
    pub fn new(access_token: String, realm_id: String, sandbox: bool) -> Self {
        let base_url = if sandbox { QBO_SANDBOX_BASE } else { QBO_API_BASE };
        Self::with_base_url(access_token, realm_id, base_url.to_string())
    }

    pub fn with_base_url(access_token: String, realm_id: String, base_url: String) -> Self {
        Self {
            client: RetryClient::new(extract_qbo_error),
            access_token,
            realm_id,
            base_url,
            token_url: QBO_TOKEN_URL.to_string(),
            creds: None,
            creds_path: None,
        }
    }

    /// Client backed by a credentials file; 401 responses trigger one
    /// refresh attempt, and rotated tokens are written back to the file.
    pub fn from_credentials(creds: QboCredentials, path: PathBuf, sandbox: bool) -> Self {
        let base_url = if sandbox { QBO_SANDBOX_BASE } else { QBO_API_BASE };
        Self {
            client: RetryClient::new(extract_qbo_error),
            access_token: creds.access_token.clone(),
            realm_id: creds.realm_id.clone(),
            base_url: base_url.to_string(),
            token_url: QBO_TOKEN_URL.to_string(),
            creds: Some(creds),
            creds_path: Some(path),
        }
    }

    #[cfg(test)]
    fn from_credentials_with_base_url(
        creds: QboCredentials,
        path: PathBuf,
        base_url: String,
    ) -> Self {
        let token_url = format!("{base_url}/oauth2/v1/tokens/bearer");
        Self {
            client: RetryClient::new(extract_qbo_error),
            access_token: creds.access_token.clone(),
            realm_id: creds.realm_id.clone(),
            base_url,
            token_url,
            creds: Some(creds),
            creds_path: Some(path),
        }
    }

    fn try_refresh(&mut self) -> Result<(), QboError> {
        let creds = self.creds.as_ref().ok_or_else(|| {
            QboError::Auth("cannot refresh token without credentials file".into())
        })?;
        let path = self.creds_path.as_ref().unwrap();

        let new_creds = refresh_access_token(creds, &self.client.http, &self.token_url)?;
        save_credentials(&new_creds, path)?;
        self.access_token = new_creds.access_token.clone();
        self.creds = Some(new_creds);
        Ok(())
    }

    fn query_url(&self) -> String {
        format!("{}/v3/company/{}/query", self.base_url, self.realm_id)
    }

    fn account_url(&self) -> String {
        format!("{}/v3/company/{}/account", self.base_url, self.realm_id)
    }

    /// Fetch the full remote chart of accounts, paginating until a short
    /// page. Returns every account or fails as a whole; a partially
    /// fetched collection is never returned.
    pub fn fetch_accounts(&mut self) -> Result<Vec<Account>, QboError> {
        let mut all = Vec::new();
        let mut start_pos = 1u32;
        let mut refreshed = false;

        loop {
            let query = format!(
                "SELECT * FROM Account ORDERBY Id ASC STARTPOSITION {start_pos} MAXRESULTS {QBO_QUERY_LIMIT}",
            );
            let url = self.query_url();
            let token = self.access_token.clone();

            let result = self.client.request_with_retry(|http| {
                http.get(&url)
                    .bearer_auth(&token)
                    .header("Accept", "application/json")
                    .query(&[("query", &query)])
            });

            let body = match result {
                Ok(body) => body,
                Err(QboError::Auth(_)) if !refreshed && self.creds.is_some() => {
                    self.try_refresh()?;
                    refreshed = true;
                    let token = self.access_token.clone();
                    self.client.request_with_retry(|http| {
                        http.get(&url)
                            .bearer_auth(&token)
                            .header("Accept", "application/json")
                            .query(&[("query", &query)])
                    })?
                }
                Err(e) => return Err(e),
            };

            let entities = body["QueryResponse"]["Account"]
                .as_array()
                .cloned()
                .unwrap_or_default();

            let count = entities.len() as u32;
            all.extend(entities.iter().filter_map(parse_account));

            if count < QBO_QUERY_LIMIT {
                break;
            }

            start_pos += count;
        }

        Ok(all)
    }

    /// Create the given accounts remotely, one POST per record. Returns the
    /// subset actually created as the remote system sees it (remote ids,
    /// `origin: remote`). Per-record validation rejections are skipped with
    /// a warning; auth, rate-limit and upstream failures abort the batch.
    pub fn create_accounts(&mut self, accounts: &[Account]) -> Result<Vec<Account>, QboError> {
        let mut created = Vec::with_capacity(accounts.len());
        let mut refreshed = false;

        for account in accounts {
            let url = self.account_url();
            let body = account_body(account);
            let token = self.access_token.clone();

            let result = self.client.request_with_retry(|http| {
                http.post(&url)
                    .bearer_auth(&token)
                    .header("Accept", "application/json")
                    .json(&body)
            });

            let response = match result {
                Ok(response) => response,
                Err(QboError::Validation(msg)) => {
                    eprintln!(
                        "warning: QBO rejected account '{}' ({}), skipping",
                        account.name, msg,
                    );
                    continue;
                }
                Err(QboError::Auth(_)) if !refreshed && self.creds.is_some() => {
                    self.try_refresh()?;
                    refreshed = true;
                    let token = self.access_token.clone();
                    self.client.request_with_retry(|http| {
                        http.post(&url)
                            .bearer_auth(&token)
                            .header("Accept", "application/json")
                            .json(&body)
                    })?
                }
                Err(e) => return Err(e),
            };

            match parse_account(&response["Account"]) {
                Some(remote) => created.push(remote),
                None => {
                    eprintln!(
                        "warning: QBO created account '{}' but returned no entity",
                        account.name,
                    );
                }
            }
        }

        Ok(created)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
