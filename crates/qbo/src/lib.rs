//! `ledgerlink-qbo` — QuickBooks Online API client.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers the sync
//! flow: fetch the remote chart of accounts, push locally-detected
//! additions, refresh OAuth2 tokens on expiry.

pub mod auth;
pub mod client;
pub mod error;
mod http;

pub use auth::{load_credentials, save_credentials, QboCredentials};
pub use client::QboClient;
pub use error::QboError;
