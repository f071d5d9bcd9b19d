//! Handlers shared by every resource: get, create, full update, status
//! change, window close and delete.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/{id}` | 404 if absent |
//! | `POST`   | `/` | Body: the record; returns 201 + stored record |
//! | `PUT`    | `/{id}` | Body: the record; replaces all mutable fields |
//! | `PATCH`  | `/{id}/status` | `?status=&updatedBy=` |
//! | `PATCH`  | `/{id}/terminate` etc. | `?endDate=` (or `expiryDate`, `closingDate`); defaults to today |
//! | `DELETE` | `/{id}` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bpm_core::{
  record::{Record, Windowed},
  status::{EntityKind, Status, parse_status},
  store::RecordStore,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
  error::ApiError,
  state::{AppState, HasEngine},
};

/// Validate an optional status filter against the kind's set.
pub fn status_filter<St: Status>(
  kind: EntityKind,
  raw: Option<&str>,
) -> Result<Option<&'static str>, ApiError> {
  Ok(raw.map(|s| parse_status::<St>(kind, s)).transpose()?.map(Status::as_str))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /{id}`
pub async fn get_one<R, S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<R>, ApiError>
where
  R: Record,
  S: RecordStore<R>,
  AppState<S>: HasEngine<R, S>,
{
  let record = HasEngine::<R, S>::engine(&state).get(id).await?;
  Ok(Json(record))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /`: the body's `createdBy` becomes the actor.
pub async fn create<R, S>(
  State(state): State<AppState<S>>,
  Json(body): Json<R>,
) -> Result<impl IntoResponse, ApiError>
where
  R: Record,
  S: RecordStore<R>,
  AppState<S>: HasEngine<R, S>,
{
  let actor = body.audit().created_by.clone();
  let record = HasEngine::<R, S>::engine(&state)
    .create(body, actor.as_deref())
    .await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /{id}`: the body's `updatedBy` becomes the actor.
pub async fn update<R, S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<R>,
) -> Result<Json<R>, ApiError>
where
  R: Record,
  S: RecordStore<R>,
  AppState<S>: HasEngine<R, S>,
{
  let actor = body.audit().updated_by.clone();
  let record = HasEngine::<R, S>::engine(&state)
    .update(id, body, actor.as_deref())
    .await?;
  Ok(Json(record))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
  pub status:     String,
  pub updated_by: Option<String>,
}

/// `PATCH /{id}/status?status=<STATUS>[&updatedBy=...]`
pub async fn set_status<R, S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Query(params): Query<StatusParams>,
) -> Result<Json<R>, ApiError>
where
  R: Record,
  S: RecordStore<R>,
  AppState<S>: HasEngine<R, S>,
{
  let status = parse_status::<R::Status>(R::KIND, &params.status)?;
  let record = HasEngine::<R, S>::engine(&state)
    .set_status(id, status, params.updated_by.as_deref())
    .await?;
  Ok(Json(record))
}

// ─── Close window ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseParams {
  #[serde(alias = "endDate", alias = "expiryDate", alias = "closingDate")]
  pub date:       Option<NaiveDate>,
  pub updated_by: Option<String>,
}

/// `PATCH /{id}/terminate|expire|close[?endDate=YYYY-MM-DD]`
pub async fn close<R, S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Query(params): Query<CloseParams>,
) -> Result<Json<R>, ApiError>
where
  R: Windowed,
  S: RecordStore<R>,
  AppState<S>: HasEngine<R, S>,
{
  let record = HasEngine::<R, S>::engine(&state)
    .close_window(id, params.date, params.updated_by.as_deref())
    .await?;
  Ok(Json(record))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /{id}`
pub async fn delete<R, S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  R: Record,
  S: RecordStore<R>,
  AppState<S>: HasEngine<R, S>,
{
  HasEngine::<R, S>::engine(&state).delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
