//! Shared HTTP plumbing: retry, backoff, error classification.

use std::thread;
use std::time::Duration;

use crate::error::QboError;

const MAX_RETRIES: u32 = 3;
pub(crate) const USER_AGENT: &str = concat!("ledgerlink/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client that handles retry, backoff, and error
/// classification. Callers pass a request-building closure; the closure is
/// invoked once per attempt so auth headers are re-applied on retry.
pub(crate) struct RetryClient {
    pub(crate) http: reqwest::blocking::Client,
    error_extractor: fn(&serde_json::Value, u16) -> String,
}

impl RetryClient {
    pub(crate) fn new(error_extractor: fn(&serde_json::Value, u16) -> String) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self { http, error_extractor }
    }

    /// Make a request with retry + exponential backoff. 401/403/400 and
    /// other non-429 4xx fail immediately; 429 and 5xx retry with backoff,
    /// respecting Retry-After on 429.
    pub(crate) fn request_with_retry(
        &self,
        build_request: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<serde_json::Value, QboError> {
        let mut backoff_secs = 1u64;

        for attempt in 0..=MAX_RETRIES {
            let result = build_request(&self.http).send();

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if status == 401 || status == 403 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        let msg = (self.error_extractor)(&body, status);
                        return Err(QboError::Auth(format!("({status}) {msg}")));
                    }

                    if status == 400 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        let msg = (self.error_extractor)(&body, status);
                        return Err(QboError::Validation(format!("({status}) {msg}")));
                    }

                    if status >= 400 && status < 500 && status != 429 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        let msg = (self.error_extractor)(&body, status);
                        return Err(QboError::Upstream(format!("({status}) {msg}")));
                    }

                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            let msg = format!("HTTP {status} after {MAX_RETRIES} attempts");
                            return Err(if status == 429 {
                                QboError::RateLimited(msg)
                            } else {
                                QboError::Upstream(msg)
                            });
                        }

                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .unwrap_or(backoff_secs)
                        } else {
                            backoff_secs
                        };

                        eprintln!(
                            "warning: retry {}/{} in {}s (HTTP {})",
                            attempt + 1,
                            MAX_RETRIES,
                            wait,
                            status,
                        );
                        thread::sleep(Duration::from_secs(wait));
                        backoff_secs *= 2;
                        continue;
                    }

                    // Success: read as text first to handle BOM-prefixed bodies.
                    let text = resp.text().map_err(|e| {
                        QboError::Upstream(format!("failed to read response body: {e}"))
                    })?;
                    let trimmed = text.trim_start_matches('\u{feff}');
                    let body: serde_json::Value =
                        serde_json::from_str(trimmed).map_err(|e| {
                            QboError::Parse(format!(
                                "{e} (body: {})",
                                &trimmed[..trimmed.len().min(200)],
                            ))
                        })?;

                    return Ok(body);
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(QboError::Upstream(format!(
                            "network error after {MAX_RETRIES} attempts: {e}",
                        )));
                    }

                    eprintln!(
                        "warning: retry {}/{} in {}s ({})",
                        attempt + 1,
                        MAX_RETRIES,
                        backoff_secs,
                        e,
                    );
                    thread::sleep(Duration::from_secs(backoff_secs));
                    backoff_secs *= 2;
                }
            }
        }

        unreachable!()
    }
}
