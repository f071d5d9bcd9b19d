//! Handlers for `/pf-code-master` endpoints.
//!
//! Capability flags are passed as `true`/`false` query parameters
//! (`hasMasterData`, `canOwnStores`, `canFranchise`, `billingCapable`).

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{get, patch},
};
use bpm_core::{
  platform::{Capabilities, Platform, PlatformField},
  query,
  status::{EntityKind, PlatformStatus},
  store::Gateway,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  crud::{self, status_filter},
  error::ApiError,
  state::AppState,
};

pub fn routes<S: Gateway>() -> Router<AppState<S>> {
  Router::new()
    .route("/", get(list::<S>).post(crud::create::<Platform, S>))
    .route(
      "/{id}",
      get(crud::get_one::<Platform, S>)
        .put(crud::update::<Platform, S>)
        .delete(crud::delete::<Platform, S>),
    )
    .route("/{id}/status", patch(crud::set_status::<Platform, S>))
    .route("/{id}/attributes", patch(update_attributes::<S>))
    .route("/code/{code}", get(by_code::<S>))
    .route("/search", get(search::<S>))
    .route("/active/with-attributes", get(active_with::<S>))
    .route("/check/code/{code}", get(check_code::<S>))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub status:          Option<String>,
  pub has_master_data: Option<bool>,
  pub can_own_stores:  Option<bool>,
  pub can_franchise:   Option<bool>,
  pub billing_capable: Option<bool>,
}

/// `GET /pf-code-master[?status=&hasMasterData=...]`
pub async fn list<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Platform>>, ApiError> {
  let status =
    status_filter::<PlatformStatus>(EntityKind::Platform, params.status.as_deref())?;
  let query = query::Query::new()
    .eq_opt(PlatformField::Status, status)
    .eq_opt(PlatformField::HasMasterData, params.has_master_data)
    .eq_opt(PlatformField::CanOwnStores, params.can_own_stores)
    .eq_opt(PlatformField::CanFranchise, params.can_franchise)
    .eq_opt(PlatformField::BillingCapable, params.billing_capable);
  Ok(Json(state.platforms.list(query).await?))
}

/// `GET /pf-code-master/code/{code}`
pub async fn by_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<Platform>, ApiError> {
  Ok(Json(state.platforms.find_by_code(&code).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub name: String,
}

/// `GET /pf-code-master/search?name=`
pub async fn search<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Platform>>, ApiError> {
  Ok(Json(state.platforms.search_by_name(&params.name).await?))
}

/// `GET /pf-code-master/active/with-attributes[?canOwnStores=true...]`
pub async fn active_with<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(filter): Query<Capabilities>,
) -> Result<Json<Vec<Platform>>, ApiError> {
  Ok(Json(state.platforms.find_active_with(filter).await?))
}

/// `PATCH /pf-code-master/{id}/attributes[?billingCapable=true...]`
///
/// Only the flags present change. `updatedBy` is taken from the same query.
pub async fn update_attributes<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Query(changes): Query<Capabilities>,
  Query(actor): Query<ActorParams>,
) -> Result<Json<Platform>, ApiError> {
  let platform = state
    .platforms
    .update_capabilities(id, changes, actor.updated_by.as_deref())
    .await?;
  Ok(Json(platform))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorParams {
  pub updated_by: Option<String>,
}

/// `GET /pf-code-master/check/code/{code}`
pub async fn check_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let exists = state.platforms.code_exists(&code).await?;
  Ok(Json(json!({ "exists": exists })))
}
