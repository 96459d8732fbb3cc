//! Service-account authentication for the Sheets API.
//!
//! Loads a Google service-account key file, signs an RS256 JWT grant, and
//! exchanges it for a short-lived bearer token. Tokens are cached until
//! shortly before expiry; there is no refresh-token dance for service
//! accounts — a new grant is simply signed when the old token ages out.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{Error, Result};

/// OAuth scopes required for reading and writing the spreadsheet.
pub const SCOPES: [&str; 2] = [
  "https://www.googleapis.com/auth/spreadsheets",
  "https://www.googleapis.com/auth/drive",
];

/// Refresh this many seconds before the token actually expires.
const EXPIRY_SLACK_SECS: i64 = 60;

/// The fields we need from a service-account JSON key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
  pub client_email: String,
  pub private_key:  String,
  pub token_uri:    String,
}

impl ServiceAccountKey {
  /// Load a key file from disk. A missing file is the configuration error
  /// the whole store is fatal without.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw =
      std::fs::read_to_string(path).map_err(|source| Error::CredentialFile {
        path: PathBuf::from(path),
        source,
      })?;
    serde_json::from_str(&raw).map_err(Error::CredentialParse)
  }
}

#[derive(Serialize)]
struct Claims<'a> {
  iss:   &'a str,
  scope: String,
  aud:   &'a str,
  iat:   i64,
  exp:   i64,
}

#[derive(Deserialize)]
struct TokenResponse {
  access_token: String,
  #[serde(default = "default_expires_in")]
  expires_in:   i64,
}

fn default_expires_in() -> i64 {
  3600
}

struct CachedToken {
  token:      String,
  expires_at: DateTime<Utc>,
}

/// Signs grants and hands out bearer tokens.
pub struct Authenticator {
  key:    ServiceAccountKey,
  http:   reqwest::Client,
  cached: Mutex<Option<CachedToken>>,
}

impl Authenticator {
  pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
    Self { key, http, cached: Mutex::new(None) }
  }

  pub fn client_email(&self) -> &str {
    &self.key.client_email
  }

  /// Return a bearer token, fetching a fresh one if the cache is empty or
  /// close to expiry.
  pub async fn bearer_token(&self) -> Result<String> {
    let mut cached = self.cached.lock().await;
    if let Some(c) = cached.as_ref()
      && c.expires_at - Utc::now() > Duration::seconds(EXPIRY_SLACK_SECS)
    {
      return Ok(c.token.clone());
    }

    let (token, expires_in) = self.fetch_token().await?;
    let expires_at = Utc::now() + Duration::seconds(expires_in);
    *cached = Some(CachedToken { token: token.clone(), expires_at });
    Ok(token)
  }

  async fn fetch_token(&self) -> Result<(String, i64)> {
    let now = Utc::now().timestamp();
    let claims = Claims {
      iss:   &self.key.client_email,
      scope: SCOPES.join(" "),
      aud:   &self.key.token_uri,
      iat:   now,
      exp:   now + 3600,
    };
    let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
    let assertion =
      jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?;

    let resp = self
      .http
      .post(&self.key.token_uri)
      .form(&[
        ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
        ("assertion", assertion.as_str()),
      ])
      .send()
      .await?;

    if !resp.status().is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::TokenExchange(body));
    }

    let body: TokenResponse = resp.json().await?;
    Ok((body.access_token, body.expires_in))
  }
}
