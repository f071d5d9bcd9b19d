//! Handlers for `/bp-store-info` endpoints.

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{get, patch},
};
use bpm_core::{
  query,
  status::{EntityKind, StoreStatus},
  store::Gateway,
  store_info::{StoreField, StoreInfo},
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
    .route("/", get(list::<S>).post(crud::create::<StoreInfo, S>))
    .route(
      "/{id}",
      get(crud::get_one::<StoreInfo, S>)
        .put(crud::update::<StoreInfo, S>)
        .delete(crud::delete::<StoreInfo, S>),
    )
    .route("/{id}/status", patch(crud::set_status::<StoreInfo, S>))
    .route("/{id}/close", patch(crud::close::<StoreInfo, S>))
    .route("/code/{code}", get(by_code::<S>))
    .route("/active/by-bp/{bp_id}", get(active_for_partner::<S>))
    .route("/count/active/{bp_id}", get(count_active::<S>))
    .route("/search/name", get(search_name::<S>))
    .route("/search/address", get(search_address::<S>))
    .route("/search/manager", get(search_manager::<S>))
    .route("/operating", get(operating::<S>))
    .route("/opened-between", get(opened_between::<S>))
    .route("/closed-between", get(closed_between::<S>))
    .route("/check/code/{code}", get(check_code::<S>))
    .route("/check/bp-store", get(check_bp_store::<S>))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub bp_id:      Option<i64>,
  pub store_type: Option<String>,
  pub status:     Option<String>,
}

/// `GET /bp-store-info[?bpId=&storeType=&status=]`
pub async fn list<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  let status =
    status_filter::<StoreStatus>(EntityKind::Store, params.status.as_deref())?;
  let query = query::Query::new()
    .eq_opt(StoreField::BpId, params.bp_id)
    .eq_opt(StoreField::Type, params.store_type)
    .eq_opt(StoreField::Status, status);
  Ok(Json(state.stores.list(query).await?))
}

pub async fn by_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<StoreInfo>, ApiError> {
  Ok(Json(state.stores.find_by_code(&code).await?))
}

pub async fn active_for_partner<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(bp_id): Path<i64>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  Ok(Json(state.stores.find_active_for_partner(bp_id).await?))
}

/// `GET /bp-store-info/count/active/{bpId}`
pub async fn count_active<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(bp_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
  let n = state.stores.count_active_for_partner(bp_id).await?;
  Ok(Json(json!({ "activeStoreCount": n })))
}

// ─── Searches ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameParams {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressParams {
  pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerParams {
  pub manager_name: String,
}

/// `GET /bp-store-info/search/name?name=`
pub async fn search_name<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<NameParams>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  Ok(Json(state.stores.search(StoreField::Name, &p.name).await?))
}

/// `GET /bp-store-info/search/address?address=`
pub async fn search_address<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<AddressParams>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  Ok(Json(state.stores.search(StoreField::Address, &p.address).await?))
}

/// `GET /bp-store-info/search/manager?managerName=`
pub async fn search_manager<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<ManagerParams>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  Ok(Json(state.stores.search(StoreField::ManagerName, &p.manager_name).await?))
}

// ─── Dates ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
  pub date: Option<NaiveDate>,
}

/// `GET /bp-store-info/operating[?date=]`: opened on or before the date and
/// not yet closed on it.
pub async fn operating<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<DateParams>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  let date = p.date.unwrap_or_else(today);
  Ok(Json(state.stores.find_operating(date).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
}

/// `GET /bp-store-info/opened-between?startDate=&endDate=` (inclusive)
pub async fn opened_between<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<RangeParams>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  Ok(Json(state.stores.find_opened_between(p.start_date, p.end_date).await?))
}

/// `GET /bp-store-info/closed-between?startDate=&endDate=` (inclusive)
pub async fn closed_between<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<RangeParams>,
) -> Result<Json<Vec<StoreInfo>>, ApiError> {
  Ok(Json(state.stores.find_closed_between(p.start_date, p.end_date).await?))
}

// ─── Checks ──────────────────────────────────────────────────────────────────

pub async fn check_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let exists = state.stores.code_exists(&code).await?;
  Ok(Json(json!({ "exists": exists })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BpStoreParams {
  pub bp_id:      i64,
  pub store_code: String,
}

/// `GET /bp-store-info/check/bp-store?bpId=&storeCode=`
pub async fn check_bp_store<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<BpStoreParams>,
) -> Result<Json<Value>, ApiError> {
  let exists = state.stores.partner_code_exists(p.bp_id, &p.store_code).await?;
  Ok(Json(json!({ "exists": exists })))
}
