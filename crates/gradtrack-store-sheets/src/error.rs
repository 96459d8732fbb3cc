//! Error type for `gradtrack-store-sheets`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The service-account key file is missing or unreadable. Fatal: nothing
  /// can be done against the remote without it.
  #[error("service account key file not found at {path}: {source}")]
  CredentialFile {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("malformed service account key file: {0}")]
  CredentialParse(#[source] serde_json::Error),

  #[error("failed to sign service account assertion: {0}")]
  Jwt(#[from] jsonwebtoken::errors::Error),

  #[error("token exchange failed: {0}")]
  TokenExchange(String),

  /// The service account can authenticate but is not allowed to touch the
  /// spreadsheet. Carries the account's email so the operator knows who to
  /// share the sheet with.
  #[error(
    "permission denied for spreadsheet {spreadsheet_id}; share the sheet \
     with {client_email}"
  )]
  PermissionDenied {
    spreadsheet_id: String,
    client_email:   String,
  },

  /// Any other non-success answer from the Sheets API, passed through.
  #[error("sheets api error (status {status}): {message}")]
  Api { status: u16, message: String },

  /// The API answered 200 but the reply was missing something we need.
  #[error("unexpected sheets api reply: {0}")]
  UnexpectedReply(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
