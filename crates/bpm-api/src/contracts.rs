//! Handlers for `/bp-contract-info` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/` | Optional `contractorBpId`, `contracteeBpId`, `pfId`, `contractType`, `status` |
//! | `GET`   | `/active/by-bp/{bpId}` | ACTIVE contracts where the partner is either party |
//! | `GET`   | `/effective` | `?date=`, defaults to today |
//! | `GET`   | `/active-between` | `?contractorBpId=&contracteeBpId=&pfId=[&date=]`; 404 if none |
//! | `PATCH` | `/{id}/terminate` | `?endDate=`, defaults to today |
//! | `GET`   | `/check/overlapping` | `?contractorBpId=&contracteeBpId=&pfId=&startDate=[&endDate=]` |

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{get, patch},
};
use bpm_core::{
  Error,
  contract::{Contract, ContractField},
  query,
  record::Record,
  status::{ContractStatus, EntityKind},
  store::Gateway,
  window::{DateWindow, today},
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
    .route("/", get(list::<S>).post(crud::create::<Contract, S>))
    .route(
      "/{id}",
      get(crud::get_one::<Contract, S>)
        .put(crud::update::<Contract, S>)
        .delete(crud::delete::<Contract, S>),
    )
    .route("/{id}/status", patch(crud::set_status::<Contract, S>))
    .route("/{id}/terminate", patch(crud::close::<Contract, S>))
    .route("/code/{code}", get(by_code::<S>))
    .route("/active/by-bp/{bp_id}", get(active_for_partner::<S>))
    .route("/effective", get(effective::<S>))
    .route("/active-between", get(active_between::<S>))
    .route("/check/code/{code}", get(check_code::<S>))
    .route("/check/overlapping", get(check_overlapping::<S>))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub contractor_bp_id: Option<i64>,
  pub contractee_bp_id: Option<i64>,
  pub pf_id:            Option<i64>,
  pub contract_type:    Option<String>,
  pub status:           Option<String>,
}

/// `GET /bp-contract-info[?contractorBpId=&...]`
pub async fn list<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contract>>, ApiError> {
  let status =
    status_filter::<ContractStatus>(EntityKind::Contract, params.status.as_deref())?;
  let query = query::Query::new()
    .eq_opt(ContractField::ContractorBpId, params.contractor_bp_id)
    .eq_opt(ContractField::ContracteeBpId, params.contractee_bp_id)
    .eq_opt(ContractField::PfId, params.pf_id)
    .eq_opt(ContractField::Type, params.contract_type)
    .eq_opt(ContractField::Status, status);
  Ok(Json(state.contracts.list(query).await?))
}

/// `GET /bp-contract-info/code/{code}`
pub async fn by_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<Contract>, ApiError> {
  Ok(Json(state.contracts.find_by_code(&code).await?))
}

/// `GET /bp-contract-info/active/by-bp/{bpId}`
pub async fn active_for_partner<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(bp_id): Path<i64>,
) -> Result<Json<Vec<Contract>>, ApiError> {
  Ok(Json(state.contracts.find_active_for_partner(bp_id).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
  pub date: Option<NaiveDate>,
}

/// `GET /bp-contract-info/effective[?date=]`
pub async fn effective<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<DateParams>,
) -> Result<Json<Vec<Contract>>, ApiError> {
  let date = params.date.unwrap_or_else(today);
  Ok(Json(state.contracts.find_effective_on(date).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetweenParams {
  pub contractor_bp_id: i64,
  pub contractee_bp_id: i64,
  pub pf_id:            i64,
  pub date:             Option<NaiveDate>,
}

/// `GET /bp-contract-info/active-between?contractorBpId=&contracteeBpId=&pfId=[&date=]`
pub async fn active_between<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<BetweenParams>,
) -> Result<Json<Contract>, ApiError> {
  let date = p.date.unwrap_or_else(today);
  let contract = state
    .contracts
    .find_active_between(p.contractor_bp_id, p.contractee_bp_id, p.pf_id, date)
    .await?
    .ok_or_else(|| {
      Error::not_found(
        Contract::KIND,
        format!(
          "{} -> {} on platform {} at {date}",
          p.contractor_bp_id, p.contractee_bp_id, p.pf_id
        ),
      )
    })?;
  Ok(Json(contract))
}

/// `GET /bp-contract-info/check/code/{code}`
pub async fn check_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let exists = state.contracts.code_exists(&code).await?;
  Ok(Json(json!({ "exists": exists })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapParams {
  pub contractor_bp_id: i64,
  pub contractee_bp_id: i64,
  pub pf_id:            i64,
  pub start_date:       NaiveDate,
  pub end_date:         Option<NaiveDate>,
}

/// `GET /bp-contract-info/check/overlapping?...`
pub async fn check_overlapping<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<OverlapParams>,
) -> Result<Json<Value>, ApiError> {
  let window = DateWindow::new(p.start_date, p.end_date);
  window.validate()?;
  let overlapping = state
    .contracts
    .has_overlapping(p.contractor_bp_id, p.contractee_bp_id, p.pf_id, window)
    .await?;
  Ok(Json(json!({ "hasOverlapping": overlapping })))
}
