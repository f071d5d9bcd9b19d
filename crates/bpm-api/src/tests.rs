use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
  response::IntoResponse as _,
};
use bpm_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiError, api_router};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header("content-type", "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

fn partner(code: &str, name: &str) -> Value {
  json!({
    "bpCode": code,
    "bpName": name,
    "bpType": "FRANCHISE",
    "createdBy": "tester",
  })
}

fn contract(code: &str, start: &str, end: Option<&str>) -> Value {
  json!({
    "contractCode": code,
    "contractorBpId": 1,
    "contracteeBpId": 2,
    "contractType": "SUPPLY",
    "pfId": 10,
    "contractStartDate": start,
    "contractEndDate": end,
  })
}

// ─── Partners ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_partner_returns_201_with_id_and_audit() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/bp-master", Some(partner("BP001", "Acme"))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(body["bpId"].as_i64().is_some());
  assert_eq!(body["status"], "ACTIVE");
  assert_eq!(body["createdBy"], "tester");
  assert!(body["createdDate"].is_string());
}

#[tokio::test]
async fn duplicate_partner_code_returns_409() {
  let app = app().await;
  send(&app, "POST", "/bp-master", Some(partner("BP001", "Acme"))).await;
  let (status, body) =
    send(&app, "POST", "/bp-master", Some(partner("BP001", "Other"))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].as_str().unwrap().contains("BP001"));
}

#[tokio::test]
async fn missing_partner_returns_404() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/bp-master/999", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_status_returns_400() {
  let app = app().await;
  let (_, created) = send(&app, "POST", "/bp-master", Some(partner("BP001", "Acme"))).await;
  let id = created["bpId"].as_i64().unwrap();

  let (status, _) =
    send(&app, "PATCH", &format!("/bp-master/{id}/status?status=CLOSED"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) =
    send(&app, "PATCH", &format!("/bp-master/{id}/status?status=suspended"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "SUSPENDED");

  let (status, _) = send(&app, "GET", "/bp-master?status=BOGUS", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partner_check_endpoints_report_existence() {
  let app = app().await;
  let mut body = partner("BP001", "Acme");
  body["businessRegNo"] = json!("123-45-67890");
  send(&app, "POST", "/bp-master", Some(body)).await;

  let (_, hit) = send(&app, "GET", "/bp-master/check/code/BP001", None).await;
  let (_, miss) = send(&app, "GET", "/bp-master/check/code/BP002", None).await;
  let (_, reg) =
    send(&app, "GET", "/bp-master/check/business-reg-no/123-45-67890", None).await;
  assert_eq!(hit, json!({ "exists": true }));
  assert_eq!(miss, json!({ "exists": false }));
  assert_eq!(reg, json!({ "exists": true }));
}

#[tokio::test]
async fn delete_returns_204_then_404() {
  let app = app().await;
  let (_, created) = send(&app, "POST", "/bp-master", Some(partner("BP001", "Acme"))).await;
  let id = created["bpId"].as_i64().unwrap();

  let (status, _) = send(&app, "DELETE", &format!("/bp-master/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, "DELETE", &format!("/bp-master/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Platforms ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn platform_capability_patch_changes_only_given_flags() {
  let app = app().await;
  let (status, created) = send(
    &app,
    "POST",
    "/pf-code-master",
    Some(json!({
      "pfCode": "PF01",
      "pfName": "Marketplace",
      "hasMasterData": true,
      "canOwnStores": false,
      "canFranchise": false,
      "billingCapable": false,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["pfId"].as_i64().unwrap();

  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/pf-code-master/{id}/attributes?billingCapable=true&updatedBy=ops"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["billingCapable"], true);
  assert_eq!(body["hasMasterData"], true);
  assert_eq!(body["updatedBy"], "ops");

  let (_, found) =
    send(&app, "GET", "/pf-code-master/active/with-attributes?billingCapable=true", None)
      .await;
  assert_eq!(found.as_array().unwrap().len(), 1);
}

// ─── Contracts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_contract_returns_409() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/bp-contract-info",
    Some(contract("C1", "2024-01-01", Some("2024-12-31"))),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) =
    send(&app, "POST", "/bp-contract-info", Some(contract("C2", "2024-06-01", None)))
      .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].as_str().unwrap().contains("overlaps"));

  let (_, check) = send(
    &app,
    "GET",
    "/bp-contract-info/check/overlapping?contractorBpId=1&contracteeBpId=2&pfId=10\
     &startDate=2025-01-01",
    None,
  )
  .await;
  assert_eq!(check, json!({ "hasOverlapping": false }));
}

#[tokio::test]
async fn inverted_contract_window_returns_400() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/bp-contract-info",
    Some(contract("C1", "2024-12-31", Some("2024-01-01"))),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn terminate_flow_ends_effectiveness() {
  let app = app().await;
  let (_, created) =
    send(&app, "POST", "/bp-contract-info", Some(contract("C1", "2024-01-01", None)))
      .await;
  let id = created["contractId"].as_i64().unwrap();

  let between = "/bp-contract-info/active-between?contractorBpId=1&contracteeBpId=2\
                 &pfId=10&date=2024-03-01";
  let (status, found) = send(&app, "GET", between, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(found["contractCode"], "C1");

  let (status, terminated) = send(
    &app,
    "PATCH",
    &format!("/bp-contract-info/{id}/terminate?endDate=2024-02-29"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(terminated["status"], "TERMINATED");
  assert_eq!(terminated["contractEndDate"], "2024-02-29");

  let (status, _) = send(&app, "GET", between, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, effective) =
    send(&app, "GET", "/bp-contract-info/effective?date=2024-02-01", None).await;
  assert!(effective.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn terminate_before_start_returns_400() {
  let app = app().await;
  let (_, created) =
    send(&app, "POST", "/bp-contract-info", Some(contract("C1", "2024-06-01", None)))
      .await;
  let id = created["contractId"].as_i64().unwrap();

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/bp-contract-info/{id}/terminate?endDate=2024-01-01"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Stores ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn store_count_and_close() {
  let app = app().await;
  for code in ["S1", "S2"] {
    let (status, _) = send(
      &app,
      "POST",
      "/bp-store-info",
      Some(json!({
        "storeCode": code,
        "bpId": 7,
        "storeName": format!("Store {code}"),
        "openingDate": "2024-01-01",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  let (_, count) = send(&app, "GET", "/bp-store-info/count/active/7", None).await;
  assert_eq!(count, json!({ "activeStoreCount": 2 }));

  let (_, stores) = send(&app, "GET", "/bp-store-info?bpId=7", None).await;
  let id = stores[0]["storeId"].as_i64().unwrap();
  let (status, closed) = send(
    &app,
    "PATCH",
    &format!("/bp-store-info/{id}/close?closingDate=2024-06-30"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(closed["status"], "CLOSED");

  let (_, count) = send(&app, "GET", "/bp-store-info/count/active/7", None).await;
  assert_eq!(count, json!({ "activeStoreCount": 1 }));

  let (_, check) =
    send(&app, "GET", "/bp-store-info/check/bp-store?bpId=7&storeCode=S2", None).await;
  assert_eq!(check, json!({ "exists": true }));
}

// ─── Mappings and permissions ────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_mapping_returns_409() {
  let app = app().await;
  let mapping = json!({
    "bpId": 1,
    "pfId": 10,
    "mappingType": "SELLER",
    "effectiveDate": "2024-01-01",
  });
  let (status, _) = send(&app, "POST", "/bp-pf-mapping", Some(mapping.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  let (status, _) = send(&app, "POST", "/bp-pf-mapping", Some(mapping)).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, check) = send(
    &app,
    "GET",
    "/bp-pf-mapping/check/duplicate?bpId=1&pfId=10&effectiveDate=2024-01-01",
    None,
  )
  .await;
  assert_eq!(check, json!({ "exists": true }));
}

#[tokio::test]
async fn permission_check_respects_window_and_expiry() {
  let app = app().await;
  let (_, created) = send(
    &app,
    "POST",
    "/bp-master-data-permission",
    Some(json!({
      "ownerBpId": 1,
      "userBpId": 2,
      "dataType": "SALES",
      "permissionType": "READ",
      "effectiveDate": "2024-01-01",
      "expiryDate": "2024-12-31",
    })),
  )
  .await;
  let id = created["permissionId"].as_i64().unwrap();

  let check = |date: &str, kind: &str| {
    format!(
      "/bp-master-data-permission/check?ownerBpId=1&userBpId=2&dataType=SALES\
       &permissionType={kind}&date={date}"
    )
  };
  let (_, inside) = send(&app, "GET", &check("2024-12-31", "READ"), None).await;
  let (_, after) = send(&app, "GET", &check("2025-01-01", "READ"), None).await;
  let (_, other) = send(&app, "GET", &check("2024-06-01", "WRITE"), None).await;
  assert_eq!(inside, json!({ "hasPermission": true }));
  assert_eq!(after, json!({ "hasPermission": false }));
  assert_eq!(other, json!({ "hasPermission": false }));

  let (status, expired) = send(
    &app,
    "PATCH",
    &format!("/bp-master-data-permission/{id}/expire?expiryDate=2024-03-31"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(expired["status"], "EXPIRED");

  let (status, _) = send(
    &app,
    "GET",
    "/bp-master-data-permission/effective?ownerBpId=1&userBpId=2&dataType=SALES\
     &date=2024-02-01",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn storage_failure_hides_driver_detail() {
  let err = ApiError::Store("near \"SELEC\": syntax error in bp_master".into());
  let resp = err.into_response();
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body, json!({ "error": "internal storage error" }));
}
