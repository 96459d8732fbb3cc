//! JSON REST API for the application tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gradtrack_core::store::ProgramStore`]. Transport concerns (CORS,
//! request tracing, the listener) are wired up by the server binary.

pub mod error;
pub mod programs;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, put},
};
use gradtrack_core::store::ProgramStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GRADTRACK_*` environment variables (environment wins).
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// The spreadsheet the tracker lives in.
  pub spreadsheet_id:       String,
  #[serde(default = "default_service_account_file")]
  pub service_account_file: PathBuf,
  #[serde(default = "default_worksheet")]
  pub worksheet:            String,
}

fn default_host() -> String {
  "0.0.0.0".to_string()
}

fn default_port() -> u16 {
  8000
}

fn default_service_account_file() -> PathBuf {
  PathBuf::from("service_account.json")
}

fn default_worksheet() -> String {
  "Applications".to_string()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ProgramStore + 'static,
{
  Router::new()
    .route("/", get(programs::root))
    .route(
      "/programs",
      get(programs::list::<S>).post(programs::create::<S>),
    )
    .route(
      "/programs/{school_name}/{program_title}",
      put(programs::update::<S>).delete(programs::delete::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use gradtrack_core::{Program, ProgramKey, calculate_rank, store::Record};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  // ── In-memory store ─────────────────────────────────────────────────────────

  #[derive(Default)]
  struct MemStore {
    programs: Mutex<Vec<Program>>,
  }

  impl ProgramStore for MemStore {
    type Error = std::convert::Infallible;

    async fn list(&self) -> Result<Vec<Record>, Self::Error> {
      let programs = self.programs.lock().unwrap();
      Ok(
        programs
          .iter()
          .map(|p| {
            serde_json::to_value(p)
              .expect("program serialises")
              .as_object()
              .expect("program is an object")
              .clone()
          })
          .collect(),
      )
    }

    async fn create(&self, mut program: Program) -> Result<Program, Self::Error> {
      program.calculated_rank = Some(calculate_rank(
        program.fit_score,
        program.tuition_cost,
        Some(&program.application_deadline).filter(|d| !d.is_empty()).map(String::as_str),
      ));
      self.programs.lock().unwrap().push(program.clone());
      Ok(program)
    }

    async fn update(
      &self,
      key: ProgramKey,
      mut program: Program,
    ) -> Result<Option<Program>, Self::Error> {
      let mut programs = self.programs.lock().unwrap();
      let Some(slot) = programs.iter_mut().find(|p| {
        p.school_name == key.school_name
          && p.program_title == key.program_title
      }) else {
        return Ok(None);
      };
      program.calculated_rank = Some(calculate_rank(
        program.fit_score,
        program.tuition_cost,
        Some(&program.application_deadline)
          .filter(|d| !d.is_empty())
          .map(String::as_str),
      ));
      *slot = program.clone();
      Ok(Some(program))
    }

    async fn delete(&self, key: ProgramKey) -> Result<bool, Self::Error> {
      let mut programs = self.programs.lock().unwrap();
      let before = programs.len();
      programs.retain(|p| {
        p.school_name != key.school_name
          || p.program_title != key.program_title
      });
      Ok(programs.len() < before)
    }
  }

  /// A store whose every operation fails, for the 500 path.
  struct BrokenStore;

  impl ProgramStore for BrokenStore {
    type Error = std::io::Error;

    async fn list(&self) -> Result<Vec<Record>, Self::Error> {
      Err(std::io::Error::other("sheet unreachable"))
    }

    async fn create(&self, _: Program) -> Result<Program, Self::Error> {
      Err(std::io::Error::other("sheet unreachable"))
    }

    async fn update(
      &self,
      _: ProgramKey,
      _: Program,
    ) -> Result<Option<Program>, Self::Error> {
      Err(std::io::Error::other("sheet unreachable"))
    }

    async fn delete(&self, _: ProgramKey) -> Result<bool, Self::Error> {
      Err(std::io::Error::other("sheet unreachable"))
    }
  }

  // ── Helpers ─────────────────────────────────────────────────────────────────

  fn program_json(school: &str, title: &str) -> Value {
    json!({
      "school_name": school,
      "program_title": title,
      "url": "https://example.edu",
      "location": "Somewhere",
      "contact_email": "admissions@example.edu",
      "fit_score": 8,
      "pros": "Good labs",
      "cons": "Expensive",
      "curriculum_focus": "Systems",
      "application_deadline": "",
      "tuition_cost": 30000.0,
      "currency": "USD",
      "application_fee": 100.0,
      "funding_scholarships": "TA positions",
      "duration": "2 years",
      "gre_gmat_required": "Optional",
      "letters_of_rec_qty": 3,
      "english_test": "TOEFL",
      "sop_essay_done": false,
      "status": "Researching",
      "portal_login": "",
      "decision_date": null,
      "is_favorite": false,
    })
  }

  async fn request(
    router: Router<()>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp =
      router.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn app() -> Router<()> {
    api_router(Arc::new(MemStore::default()))
  }

  // ── Routes ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_returns_welcome() {
    let (status, body) = request(app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Tracker"));
  }

  #[tokio::test]
  async fn list_starts_empty() {
    let (status, body) = request(app(), "GET", "/programs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn create_returns_201_with_computed_rank() {
    let (status, body) = request(
      app(),
      "POST",
      "/programs",
      Some(program_json("MIT", "MSc EECS")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["school_name"], "MIT");
    assert!(body["calculated_rank"].is_number());
  }

  #[tokio::test]
  async fn client_rank_in_body_is_overwritten() {
    let mut payload = program_json("MIT", "MSc EECS");
    payload["calculated_rank"] = json!(99.99);
    let (status, body) =
      request(app(), "POST", "/programs", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    // fit 0.8·0.6 + cost 0.7·0.3 + no deadline = 69.0
    assert_eq!(body["calculated_rank"], json!(69.0));
  }

  #[tokio::test]
  async fn created_program_shows_up_in_list() {
    let app = app();
    request(
      app.clone(),
      "POST",
      "/programs",
      Some(program_json("MIT", "MSc EECS")),
    )
    .await;

    let (status, body) = request(app, "GET", "/programs", None).await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["school_name"], "MIT");
    assert!(records[0]["calculated_rank"].is_number());
  }

  #[tokio::test]
  async fn put_replaces_record() {
    let app = app();
    request(
      app.clone(),
      "POST",
      "/programs",
      Some(program_json("MIT", "MSc EECS")),
    )
    .await;

    let mut edited = program_json("MIT", "MSc EECS");
    edited["status"] = json!("Submitted");
    let (status, body) = request(
      app.clone(),
      "PUT",
      "/programs/MIT/MSc%20EECS",
      Some(edited),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Submitted");

    let (_, listed) = request(app, "GET", "/programs", None).await;
    assert_eq!(listed[0]["status"], "Submitted");
  }

  #[tokio::test]
  async fn put_unknown_key_returns_404() {
    let (status, body) = request(
      app(),
      "PUT",
      "/programs/Nowhere/Nothing",
      Some(program_json("Nowhere", "Nothing")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn delete_removes_record() {
    let app = app();
    request(
      app.clone(),
      "POST",
      "/programs",
      Some(program_json("MIT", "MSc EECS")),
    )
    .await;

    let (status, body) =
      request(app.clone(), "DELETE", "/programs/MIT/MSc%20EECS", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let (_, listed) = request(app, "GET", "/programs", None).await;
    assert_eq!(listed, json!([]));
  }

  #[tokio::test]
  async fn delete_unknown_key_returns_404() {
    let (status, _) =
      request(app(), "DELETE", "/programs/Nowhere/Nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Failure mapping ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn store_failure_becomes_500_with_original_text() {
    let app = api_router(Arc::new(BrokenStore));
    let (status, body) = request(app, "GET", "/programs", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("sheet unreachable"));
  }
}
