//! Handlers for the `/programs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/programs` | Header-keyed records, straight from the sheet |
//! | `POST`   | `/programs` | Full program body; rank is server-computed |
//! | `PUT`    | `/programs/{school}/{title}` | Whole-record replace; 404 on miss |
//! | `DELETE` | `/programs/{school}/{title}` | 404 on miss |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gradtrack_core::{
  Program, ProgramKey,
  store::{ProgramStore, Record},
};
use serde_json::json;

use crate::error::ApiError;

/// `GET /` — static welcome payload.
pub async fn root() -> impl IntoResponse {
  Json(json!({ "message": "Welcome to the Master's Application Tracker API" }))
}

/// `GET /programs`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: ProgramStore,
{
  let records = store
    .list()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(records))
}

/// `POST /programs` — returns 201 + the record with its computed rank.
/// Any `calculated_rank` in the body is discarded by the store.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<Program>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProgramStore,
{
  let created = store
    .create(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /programs/{school_name}/{program_title}` — whole-record replace.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((school_name, program_title)): Path<(String, String)>,
  Json(body): Json<Program>,
) -> Result<Json<Program>, ApiError>
where
  S: ProgramStore,
{
  let key = ProgramKey { school_name, program_title };
  let updated = store
    .update(key.clone(), body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "program not found: {} / {}",
        key.school_name, key.program_title,
      ))
    })?;
  Ok(Json(updated))
}

/// `DELETE /programs/{school_name}/{program_title}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((school_name, program_title)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ProgramStore,
{
  let key = ProgramKey { school_name, program_title };
  let deleted = store
    .delete(key.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!(
      "program not found: {} / {}",
      key.school_name, key.program_title,
    )));
  }
  Ok(Json(json!({ "message": "Program deleted successfully" })))
}
