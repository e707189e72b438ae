//! OAuth2 credentials: file storage and token refresh.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::QboError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QboCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
    pub realm_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<String>,
}

pub fn load_credentials(path: &Path) -> Result<QboCredentials, QboError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        QboError::NotAuthenticated(format!(
            "cannot read credentials file {}: {}",
            path.display(),
            e,
        ))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = std::fs::metadata(path) {
            let mode = meta.permissions().mode();
            if mode & 0o077 != 0 {
                eprintln!(
                    "warning: credentials file {} is accessible by others (mode {:o}), consider chmod 600",
                    path.display(),
                    mode & 0o777,
                );
            }
        }
    }

    serde_json::from_str(&content).map_err(|e| {
        QboError::NotAuthenticated(format!(
            "invalid credentials JSON in {}: {}",
            path.display(),
            e,
        ))
    })
}

pub fn save_credentials(creds: &QboCredentials, path: &Path) -> Result<(), QboError> {
    let json = serde_json::to_string_pretty(creds)
        .map_err(|e| QboError::Io(format!("failed to serialize credentials: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        QboError::Io(format!(
            "failed to write credentials to {}: {}",
            path.display(),
            e,
        ))
    })
}

/// Exchange the refresh token for a new access token at the Intuit bearer
/// endpoint. Returns rotated credentials; the caller persists them.
pub(crate) fn refresh_access_token(
    creds: &QboCredentials,
    http: &reqwest::blocking::Client,
    token_url: &str,
) -> Result<QboCredentials, QboError> {
    use base64::Engine;

    let basic = base64::engine::general_purpose::STANDARD
        .encode(format!("{}:{}", creds.client_id, creds.client_secret));

    let resp = http
        .post(token_url)
        .header("Authorization", format!("Basic {basic}"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(format!(
            "grant_type=refresh_token&refresh_token={}",
            creds.refresh_token,
        ))
        .send()
        .map_err(|e| QboError::Auth(format!("token refresh request failed: {e}")))?;

    let status = resp.status().as_u16();
    if status != 200 {
        let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
        let msg = body["error_description"]
            .as_str()
            .or_else(|| body["error"].as_str())
            .unwrap_or("unknown error");
        return Err(QboError::Auth(format!(
            "token refresh failed ({status}): {msg} — reconnect QuickBooks to regenerate credentials",
        )));
    }

    let body: serde_json::Value = resp
        .json()
        .map_err(|e| QboError::Auth(format!("token refresh response invalid: {e}")))?;

    let new_access = body["access_token"]
        .as_str()
        .ok_or_else(|| QboError::Auth("token refresh response missing access_token".into()))?;

    let new_refresh = body["refresh_token"].as_str().unwrap_or(&creds.refresh_token);

    let access_token_expires_at = body["expires_in"]
        .as_i64()
        .map(|secs| (Utc::now() + chrono::Duration::seconds(secs)).to_rfc3339());

    let refresh_token_expires_at = body["x_refresh_token_expires_in"]
        .as_i64()
        .map(|secs| {
            let expires = Utc::now() + chrono::Duration::seconds(secs);
            let days_left = (expires - Utc::now()).num_days();
            if days_left <= 30 {
                eprintln!(
                    "warning: QBO refresh token expires {}, re-authorize soon",
                    expires.format("%Y-%m-%d"),
                );
            }
            expires.to_rfc3339()
        })
        .or_else(|| creds.refresh_token_expires_at.clone());

    Ok(QboCredentials {
        client_id: creds.client_id.clone(),
        client_secret: creds.client_secret.clone(),
        access_token: new_access.to_string(),
        refresh_token: new_refresh.to_string(),
        realm_id: creds.realm_id.clone(),
        access_token_expires_at,
        refresh_token_expires_at,
    })
}
