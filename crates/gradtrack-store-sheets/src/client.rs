//! The [`SheetsApi`] seam and its Google Sheets v4 REST implementation.
//!
//! [`SheetsStore`](crate::SheetsStore) only ever talks to a worksheet
//! through this trait, so the row-matching and header-healing logic can be
//! exercised against an in-memory sheet in tests.
//!
//! All row and column indices are 1-based, matching A1 notation.

use std::future::Future;

use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  Error, Result,
  auth::{Authenticator, ServiceAccountKey},
  encode::HEADERS,
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Low-level value operations on a single worksheet.
pub trait SheetsApi: Send + Sync {
  /// Every cell of the worksheet, header row included. Rows may be ragged:
  /// trailing empty cells are not guaranteed to be present.
  fn get_all_values(
    &self,
  ) -> impl Future<Output = Result<Vec<Vec<String>>>> + Send + '_;

  /// Append `row` after the last data row.
  fn append_row(
    &self,
    row: Vec<String>,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Overwrite the row at `row_idx` starting from column A.
  fn update_row(
    &self,
    row_idx: usize,
    row: Vec<String>,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Overwrite a single cell.
  fn update_cell(
    &self,
    row_idx: usize,
    col_idx: usize,
    value: String,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Insert an empty column at `col_idx` (existing columns shift right) and
  /// write `header` into its header cell.
  fn insert_column(
    &self,
    col_idx: usize,
    header: String,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Remove the row at `row_idx`; rows below shift up.
  fn delete_row(
    &self,
    row_idx: usize,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}

// ─── A1 helpers ──────────────────────────────────────────────────────────────

/// 1-based column index → A1 letters (1 → "A", 27 → "AA").
pub(crate) fn col_to_a1(mut col: usize) -> String {
  debug_assert!(col >= 1);
  let mut letters = Vec::new();
  while col > 0 {
    let rem = (col - 1) % 26;
    letters.push(b'A' + rem as u8);
    col = (col - 1) / 26;
  }
  letters.reverse();
  String::from_utf8(letters).expect("ascii")
}

// ─── REST client ─────────────────────────────────────────────────────────────

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Deserialize)]
struct ValueRange {
  #[serde(default)]
  values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetMeta {
  #[serde(default)]
  sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
  properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
  sheet_id: i64,
  title:    String,
}

/// A single worksheet of a single spreadsheet, via the Sheets v4 REST API.
pub struct HttpSheets {
  http:           reqwest::Client,
  auth:           Authenticator,
  spreadsheet_id: String,
  title:          String,
  sheet_id:       i64,
}

impl HttpSheets {
  /// Authenticate with the key file at `service_account_file` and resolve
  /// the worksheet named `title`, creating it (with the full header row) if
  /// the spreadsheet does not have one yet.
  pub async fn open(
    service_account_file: impl AsRef<std::path::Path>,
    spreadsheet_id: impl Into<String>,
    title: impl Into<String>,
  ) -> Result<Self> {
    let key = ServiceAccountKey::from_file(service_account_file)?;
    let http = reqwest::Client::new();
    let auth = Authenticator::new(key, http.clone());

    let mut sheets = Self {
      http,
      auth,
      spreadsheet_id: spreadsheet_id.into(),
      title: title.into(),
      sheet_id: 0,
    };
    sheets.sheet_id = sheets.ensure_worksheet().await?;
    Ok(sheets)
  }

  /// The principal all requests act as. Surfaces in permission errors so
  /// the operator knows who to share the sheet with.
  pub fn client_email(&self) -> &str {
    self.auth.client_email()
  }

  async fn ensure_worksheet(&self) -> Result<i64> {
    let url = format!(
      "{API_BASE}/{}?fields=sheets.properties",
      self.spreadsheet_id
    );
    let resp = self.send(self.http.get(url)).await?;
    let meta: SpreadsheetMeta = resp.json().await?;

    if let Some(sheet) =
      meta.sheets.iter().find(|s| s.properties.title == self.title)
    {
      return Ok(sheet.properties.sheet_id);
    }

    tracing::info!(worksheet = %self.title, "worksheet missing, creating it");
    let reply = self
      .batch_update(json!([{
        "addSheet": {
          "properties": {
            "title": self.title,
            "gridProperties": { "rowCount": 100, "columnCount": 26 },
          }
        }
      }]))
      .await?;
    let sheet_id = reply["replies"][0]["addSheet"]["properties"]["sheetId"]
      .as_i64()
      .ok_or_else(|| {
        Error::UnexpectedReply("addSheet reply missing sheetId".into())
      })?;

    self
      .append_row(HEADERS.iter().map(|h| h.to_string()).collect())
      .await?;
    Ok(sheet_id)
  }

  /// Attach a bearer token, send, and map non-success statuses. A 403 is
  /// the "sheet not shared with the service account" case.
  async fn send(
    &self,
    request: reqwest::RequestBuilder,
  ) -> Result<reqwest::Response> {
    let token = self.auth.bearer_token().await?;
    let resp = request.bearer_auth(token).send().await?;
    let status = resp.status();
    if status == reqwest::StatusCode::FORBIDDEN {
      return Err(Error::PermissionDenied {
        spreadsheet_id: self.spreadsheet_id.clone(),
        client_email:   self.auth.client_email().to_string(),
      });
    }
    if !status.is_success() {
      let message = resp.text().await.unwrap_or_default();
      return Err(Error::Api { status: status.as_u16(), message });
    }
    Ok(resp)
  }

  /// URL for a `values/{range}` endpoint. The range goes through a path
  /// segment push so worksheet titles with spaces survive.
  fn values_url(&self, range: &str, suffix: &str) -> Url {
    let mut url = Url::parse(API_BASE).expect("static base url");
    url
      .path_segments_mut()
      .expect("https url")
      .push(&self.spreadsheet_id)
      .push("values")
      .push(&format!("{range}{suffix}"));
    url
  }

  fn range(&self, cell: &str) -> String {
    format!("'{}'!{}", self.title, cell)
  }

  fn range_whole_sheet(&self) -> String {
    format!("'{}'", self.title)
  }

  async fn batch_update(&self, requests: Value) -> Result<Value> {
    let url = format!("{API_BASE}/{}:batchUpdate", self.spreadsheet_id);
    let resp = self
      .send(self.http.post(url).json(&json!({ "requests": requests })))
      .await?;
    Ok(resp.json().await?)
  }
}

impl SheetsApi for HttpSheets {
  async fn get_all_values(&self) -> Result<Vec<Vec<String>>> {
    let url = self.values_url(&self.range_whole_sheet(), "");
    let resp = self.send(self.http.get(url)).await?;
    let body: ValueRange = resp.json().await?;
    Ok(
      body
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect(),
    )
  }

  async fn append_row(&self, row: Vec<String>) -> Result<()> {
    let mut url = self.values_url(&self.range("A1"), ":append");
    url
      .query_pairs_mut()
      .append_pair("valueInputOption", "RAW")
      .append_pair("insertDataOption", "INSERT_ROWS");
    self
      .send(self.http.post(url).json(&json!({ "values": [row] })))
      .await?;
    Ok(())
  }

  async fn update_row(&self, row_idx: usize, row: Vec<String>) -> Result<()> {
    let mut url = self.values_url(&self.range(&format!("A{row_idx}")), "");
    url.query_pairs_mut().append_pair("valueInputOption", "RAW");
    self
      .send(self.http.put(url).json(&json!({ "values": [row] })))
      .await?;
    Ok(())
  }

  async fn update_cell(
    &self,
    row_idx: usize,
    col_idx: usize,
    value: String,
  ) -> Result<()> {
    let cell = format!("{}{row_idx}", col_to_a1(col_idx));
    let mut url = self.values_url(&self.range(&cell), "");
    url.query_pairs_mut().append_pair("valueInputOption", "RAW");
    self
      .send(self.http.put(url).json(&json!({ "values": [[value]] })))
      .await?;
    Ok(())
  }

  async fn insert_column(&self, col_idx: usize, header: String) -> Result<()> {
    self
      .batch_update(json!([{
        "insertDimension": {
          "range": {
            "sheetId":    self.sheet_id,
            "dimension":  "COLUMNS",
            "startIndex": col_idx - 1,
            "endIndex":   col_idx,
          },
          "inheritFromBefore": false,
        }
      }]))
      .await?;
    self.update_cell(1, col_idx, header).await
  }

  async fn delete_row(&self, row_idx: usize) -> Result<()> {
    self
      .batch_update(json!([{
        "deleteDimension": {
          "range": {
            "sheetId":    self.sheet_id,
            "dimension":  "ROWS",
            "startIndex": row_idx - 1,
            "endIndex":   row_idx,
          }
        }
      }]))
      .await?;
    Ok(())
  }
}

/// The values endpoint returns formatted cells, which are JSON strings, but
/// tolerate bare numbers anyway.
fn cell_to_string(cell: Value) -> String {
  match cell {
    Value::String(s) => s,
    other => other.to_string(),
  }
}
