//! Handlers for `/bp-pf-mapping` endpoints.

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{get, patch},
};
use bpm_core::{
  mapping::{MappingField, PlatformMapping},
  query,
  status::{EntityKind, MappingStatus},
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
    .route("/", get(list::<S>).post(crud::create::<PlatformMapping, S>))
    .route(
      "/{id}",
      get(crud::get_one::<PlatformMapping, S>)
        .put(crud::update::<PlatformMapping, S>)
        .delete(crud::delete::<PlatformMapping, S>),
    )
    .route("/{id}/status", patch(crud::set_status::<PlatformMapping, S>))
    .route("/{id}/expire", patch(crud::close::<PlatformMapping, S>))
    .route("/by-bp-pf", get(by_partner_platform::<S>))
    .route("/by-target/{id}", get(by_target::<S>))
    .route("/by-parent/{id}", get(by_parent::<S>))
    .route("/effective", get(effective::<S>))
    .route("/check/duplicate", get(check_duplicate::<S>))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub bp_id:  Option<i64>,
  pub pf_id:  Option<i64>,
  pub status: Option<String>,
}

/// `GET /bp-pf-mapping[?bpId=&pfId=&status=]`
pub async fn list<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PlatformMapping>>, ApiError> {
  let status = status_filter::<MappingStatus>(
    EntityKind::PlatformMapping,
    params.status.as_deref(),
  )?;
  let query = query::Query::new()
    .eq_opt(MappingField::BpId, params.bp_id)
    .eq_opt(MappingField::PfId, params.pf_id)
    .eq_opt(MappingField::Status, status);
  Ok(Json(state.mappings.list(query).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPlatformParams {
  pub bp_id: i64,
  pub pf_id: i64,
}

/// `GET /bp-pf-mapping/by-bp-pf?bpId=&pfId=`
pub async fn by_partner_platform<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<PartnerPlatformParams>,
) -> Result<Json<Vec<PlatformMapping>>, ApiError> {
  Ok(Json(state.mappings.find_for_partner_platform(p.bp_id, p.pf_id).await?))
}

pub async fn by_target<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<PlatformMapping>>, ApiError> {
  Ok(Json(state.mappings.find_by_target(id).await?))
}

pub async fn by_parent<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<PlatformMapping>>, ApiError> {
  Ok(Json(state.mappings.find_by_parent(id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveParams {
  pub bp_id: i64,
  pub date:  Option<NaiveDate>,
}

/// `GET /bp-pf-mapping/effective?bpId=[&date=]`
pub async fn effective<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<EffectiveParams>,
) -> Result<Json<Vec<PlatformMapping>>, ApiError> {
  let date = p.date.unwrap_or_else(today);
  Ok(Json(state.mappings.find_effective_for_partner(p.bp_id, date).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateParams {
  pub bp_id:          i64,
  pub pf_id:          i64,
  pub target_bp_id:   Option<i64>,
  pub effective_date: NaiveDate,
}

/// `GET /bp-pf-mapping/check/duplicate?bpId=&pfId=[&targetBpId=]&effectiveDate=`
pub async fn check_duplicate<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(p): Query<DuplicateParams>,
) -> Result<Json<Value>, ApiError> {
  let exists = state
    .mappings
    .is_duplicate(p.bp_id, p.pf_id, p.target_bp_id, p.effective_date)
    .await?;
  Ok(Json(json!({ "exists": exists })))
}
