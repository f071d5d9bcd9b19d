//! Handlers for `/bp-master` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Optional `status`, `type`, `primaryPfCode`, `businessRegNo` |
//! | `GET`  | `/code/{code}` | |
//! | `GET`  | `/active` | ACTIVE partners by name; optional `type` |
//! | `GET`  | `/search` | `?name=` case-insensitive substring |
//! | `GET`  | `/check/code/{code}` | `{"exists": bool}` |
//! | `GET`  | `/check/business-reg-no/{no}` | `{"exists": bool}` |

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{get, patch},
};
use bpm_core::{
  partner::{Partner, PartnerField},
  query,
  status::{EntityKind, PartnerStatus},
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
    .route("/", get(list::<S>).post(crud::create::<Partner, S>))
    .route(
      "/{id}",
      get(crud::get_one::<Partner, S>)
        .put(crud::update::<Partner, S>)
        .delete(crud::delete::<Partner, S>),
    )
    .route("/{id}/status", patch(crud::set_status::<Partner, S>))
    .route("/code/{code}", get(by_code::<S>))
    .route("/active", get(active::<S>))
    .route("/search", get(search::<S>))
    .route("/check/code/{code}", get(check_code::<S>))
    .route("/check/business-reg-no/{no}", get(check_reg_no::<S>))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub status:          Option<String>,
  #[serde(rename = "type")]
  pub bp_type:         Option<String>,
  pub primary_pf_code: Option<String>,
  pub business_reg_no: Option<String>,
}

/// `GET /bp-master[?status=&type=&primaryPfCode=&businessRegNo=]`
pub async fn list<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Partner>>, ApiError> {
  let status =
    status_filter::<PartnerStatus>(EntityKind::Partner, params.status.as_deref())?;
  let query = query::Query::new()
    .eq_opt(PartnerField::Status, status)
    .eq_opt(PartnerField::Type, params.bp_type)
    .eq_opt(PartnerField::PrimaryPfCode, params.primary_pf_code)
    .eq_opt(PartnerField::BusinessRegNo, params.business_reg_no);
  Ok(Json(state.partners.list(query).await?))
}

/// `GET /bp-master/code/{code}`
pub async fn by_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<Partner>, ApiError> {
  Ok(Json(state.partners.find_by_code(&code).await?))
}

#[derive(Debug, Deserialize)]
pub struct ActiveParams {
  #[serde(rename = "type")]
  pub bp_type: Option<String>,
}

/// `GET /bp-master/active[?type=]`
pub async fn active<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<ActiveParams>,
) -> Result<Json<Vec<Partner>>, ApiError> {
  Ok(Json(state.partners.find_active(params.bp_type.as_deref()).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub name: String,
}

/// `GET /bp-master/search?name=`
pub async fn search<S: Gateway>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Partner>>, ApiError> {
  Ok(Json(state.partners.search_by_name(&params.name).await?))
}

/// `GET /bp-master/check/code/{code}`
pub async fn check_code<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let exists = state.partners.code_exists(&code).await?;
  Ok(Json(json!({ "exists": exists })))
}

/// `GET /bp-master/check/business-reg-no/{no}`
pub async fn check_reg_no<S: Gateway>(
  State(state): State<AppState<S>>,
  Path(no): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let exists = state.partners.business_reg_no_exists(&no).await?;
  Ok(Json(json!({ "exists": exists })))
}
