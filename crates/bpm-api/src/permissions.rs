//! Handlers for `/bp-master-data-permission` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/active` | `?ownerBpId=&userBpId=&dataType=` |
//! | `GET`  | `/effective` | same plus `[&date=]`; 404 if none |
//! | `GET`  | `/effective/all` | `[?date=]` |
//! | `GET`  | `/check` | same plus `&permissionType=`; `{"hasPermission": bool}` |
//! | `GET`  | `/check/duplicate` | same plus `&effectiveDate=`; `{"exists": bool}` |

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{get, patch},
};
use bpm_core::{
  Error,
  permission::{DataPermission, PermissionField},
  query,
  record::Record,
  status::{EntityKind, PermissionStatus},
  store::Gateway,
  window::today,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  crud::{self, status_filter},
  error::ApiError,
  state::AppState,
};

pub fn routes<S: Gateway>() -> Router<AppState<S>> {
  Router::new()
    .route("/", get(list::<S>).post(crud::create::<DataPermission, S>))
    .route(
      "/{id}",
      get(crud::get_one::<DataPermission, S>)
        .put(crud::update::<DataPermission, S>)
        .delete(crud::delete::<DataPermission, S>),
    )
    .route("/{id}/status", patch(crud::set_status::<DataPermission, S>))
    .route("/{id}/expire", patch(crud::close::<DataPermission, S>))
    .route("/active", get(active::<S>))
    .route("/effective", get(effective::<S>))
    .route("/effective/all", get(effective_all::<S>))
    .route("/check", get(check::<S>))
    .route("/check/duplicate", get(check_duplicate::<S>))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub owner_bp_id:     Option<i64>,
  pub user_bp_id:      Option<i64>,
  pub data_type:       Option<String>,
  pub permission_type: Option<String>,
  pub status:          Option<String>,
}

/// `GET /bp-master-data-permission[?ownerBpId=&userBpId=&...]`
pub async fn list<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<DataPermission>>, ApiError> {
  let status = status_filter::<PermissionStatus>(
    EntityKind::DataPermission,
    params.status.as_deref(),
  )?;
  let query = query::Query::new()
    .eq_opt(PermissionField::OwnerBpId, params.owner_bp_id)
    .eq_opt(PermissionField::UserBpId, params.user_bp_id)
    .eq_opt(PermissionField::DataType, params.data_type)
    .eq_opt(PermissionField::PermissionType, params.permission_type)
    .eq_opt(PermissionField::Status, status);
  Ok(Json(state.permissions.list(query).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeParams {
  pub owner_bp_id: i64,
  pub user_bp_id:  i64,
  pub data_type:   String,
  pub date:        Option<NaiveDate>,
}

/// `GET /bp-master-data-permission/active?ownerBpId=&userBpId=&dataType=`
pub async fn active<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<ScopeParams>,
) -> Result<Json<Vec<DataPermission>>, ApiError> {
  let found = state
    .permissions
    .find_active(p.owner_bp_id, p.user_bp_id, &p.data_type)
    .await?;
  Ok(Json(found))
}

/// `GET /bp-master-data-permission/effective?ownerBpId=&userBpId=&dataType=[&date=]`
pub async fn effective<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<ScopeParams>,
) -> Result<Json<DataPermission>, ApiError> {
  let date = p.date.unwrap_or_else(today);
  let permission = state
    .permissions
    .find_effective_permission(p.owner_bp_id, p.user_bp_id, &p.data_type, date)
    .await?
    .ok_or_else(|| {
      Error::not_found(
        DataPermission::KIND,
        format!("{} -> {} {} at {date}", p.owner_bp_id, p.user_bp_id, p.data_type),
      )
    })?;
  Ok(Json(permission))
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
  pub date: Option<NaiveDate>,
}

/// `GET /bp-master-data-permission/effective/all[?date=]`
pub async fn effective_all<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<DateParams>,
) -> Result<Json<Vec<DataPermission>>, ApiError> {
  let date = p.date.unwrap_or_else(today);
  Ok(Json(state.permissions.find_effective_on(date).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckParams {
  pub owner_bp_id:     i64,
  pub user_bp_id:      i64,
  pub data_type:       String,
  pub permission_type: String,
  pub date:            Option<NaiveDate>,
}

/// `GET /bp-master-data-permission/check?...&permissionType=[&date=]`
pub async fn check<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<CheckParams>,
) -> Result<Json<Value>, ApiError> {
  let date = p.date.unwrap_or_else(today);
  let allowed = state
    .permissions
    .has_permission(p.owner_bp_id, p.user_bp_id, &p.data_type, &p.permission_type, date)
    .await?;
  Ok(Json(json!({ "hasPermission": allowed })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateParams {
  pub owner_bp_id:    i64,
  pub user_bp_id:     i64,
  pub data_type:      String,
  pub effective_date: NaiveDate,
}

/// `GET /bp-master-data-permission/check/duplicate?...&effectiveDate=`
pub async fn check_duplicate<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<DuplicateParams>,
) -> Result<Json<Value>, ApiError> {
  let exists = state
    .permissions
    .is_duplicate(p.owner_bp_id, p.user_bp_id, &p.data_type, p.effective_date)
    .await?;
  Ok(Json(json!({ "exists": exists })))
}
