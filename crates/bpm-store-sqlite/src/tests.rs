//! Integration tests for `SqliteStore` and the lifecycle engine against an
//! in-memory database.

use std::sync::Arc;

use bpm_core::{
  Error,
  contract::Contract,
  engine::LifecycleEngine,
  mapping::PlatformMapping,
  partner::Partner,
  permission::DataPermission,
  platform::{Capabilities, Platform},
  record::{Audit, Record},
  status::{ContractStatus, MappingStatus, PartnerStatus, PermissionStatus, StoreStatus},
  store::{GatewayError, RecordStore},
  store_info::{StoreField, StoreInfo},
  window::DateWindow,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::SqliteStore;

async fn store() -> Arc<SqliteStore> {
  Arc::new(
    SqliteStore::open_in_memory()
      .await
      .expect("in-memory store"),
  )
}

fn engine<R: crate::Table>(s: &Arc<SqliteStore>) -> LifecycleEngine<R, SqliteStore> {
  LifecycleEngine::new(Arc::clone(s))
}

fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

fn partner(code: &str, reg_no: Option<&str>) -> Partner {
  Partner {
    bp_id:               None,
    bp_code:             code.into(),
    bp_name:             format!("Partner {code}"),
    bp_type:             "FRANCHISOR".into(),
    business_reg_no:     reg_no.map(Into::into),
    representative_name: None,
    address:             None,
    phone_number:        None,
    email:               None,
    primary_pf_code:     None,
    status:              PartnerStatus::Active,
    erp_usage_fee:       Some(Decimal::new(9900, 2)),
    commission_rate:     None,
    audit:               Audit::default(),
  }
}

fn contract(code: &str, start: &str, end: Option<&str>) -> Contract {
  Contract {
    contract_id:         None,
    contract_code:       code.into(),
    contractor_bp_id:    1,
    contractee_bp_id:    2,
    contract_type:       "FRANCHISE".into(),
    pf_id:               10,
    contract_start_date: d(start),
    contract_end_date:   end.map(d),
    contract_terms:      None,
    fee_rate:            None,
    status:              ContractStatus::Active,
    audit:               Audit::default(),
  }
}

fn shop(code: &str, bp_id: i64, opening: Option<&str>, closing: Option<&str>) -> StoreInfo {
  StoreInfo {
    store_id:     None,
    store_code:   code.into(),
    bp_id,
    store_name:   format!("Store {code}"),
    store_type:   Some("DIRECT".into()),
    address:      Some("12 Harbour Road".into()),
    phone_number: None,
    manager_name: Some("Kim".into()),
    opening_date: opening.map(d),
    closing_date: closing.map(d),
    status:       StoreStatus::Active,
    audit:        Audit::default(),
  }
}

fn mapping(target: Option<i64>, effective: &str) -> PlatformMapping {
  PlatformMapping {
    mapping_id:     None,
    bp_id:          1,
    pf_id:          10,
    target_bp_id:   target,
    parent_bp_id:   None,
    mapping_type:   "RESELLER".into(),
    effective_date: d(effective),
    expiry_date:    None,
    status:         MappingStatus::Active,
    audit:          Audit::default(),
  }
}

fn permission(effective: &str, expiry: Option<&str>) -> DataPermission {
  DataPermission {
    permission_id:   None,
    owner_bp_id:     1,
    user_bp_id:      2,
    data_type:       "SALES".into(),
    permission_type: "READ".into(),
    effective_date:  d(effective),
    expiry_date:     expiry.map(d),
    status:          PermissionStatus::Active,
    audit:           Audit::default(),
  }
}

// ─── Partners ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_round_trips() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  let created = bps
    .create(partner("BP001", Some("123-45-67890")), Some("alice"))
    .await
    .unwrap();
  let id = created.bp_id.expect("assigned id");
  assert!(created.audit.created_date.is_some());
  assert_eq!(created.audit.created_by.as_deref(), Some("alice"));

  let fetched = bps.get(id).await.unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.erp_usage_fee, Some(Decimal::new(9900, 2)));
}

#[tokio::test]
async fn client_supplied_id_is_discarded() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  let mut input = partner("BP001", None);
  input.bp_id = Some(999);
  let created = bps.create(input, None).await.unwrap();
  assert_ne!(created.bp_id, Some(999));
  assert!(matches!(bps.get(999).await, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn duplicate_partner_code_conflicts() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  let first = bps.create(partner("BP001", None), None).await.unwrap();
  let err = bps.create(partner("BP001", None), None).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(ref m) if m.contains("BP001")), "{err}");

  let still = bps.get(first.bp_id.unwrap()).await.unwrap();
  assert_eq!(still, first);
  assert_eq!(bps.list(Default::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_registration_numbers_do_not_collide() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  bps.create(partner("BP001", None), None).await.unwrap();
  bps.create(partner("BP002", None), None).await.unwrap();
  bps.create(partner("BP003", Some("111")), None).await.unwrap();

  let err = bps.create(partner("BP004", Some("111")), None).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
  assert!(bps.business_reg_no_exists("111").await.unwrap());
  assert!(!bps.code_exists("BP004").await.unwrap());
}

#[tokio::test]
async fn update_keeps_code_and_creation_stamp() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  let created = bps.create(partner("BP001", None), Some("alice")).await.unwrap();
  let id = created.bp_id.unwrap();

  let mut changes = partner("IGNORED", None);
  changes.bp_name = "Renamed".into();
  changes.status = PartnerStatus::Suspended;
  let updated = bps.update(id, changes, Some("bob")).await.unwrap();

  assert_eq!(updated.bp_code, "BP001");
  assert_eq!(updated.bp_name, "Renamed");
  assert_eq!(updated.status, PartnerStatus::Suspended);
  assert_eq!(updated.audit.created_by.as_deref(), Some("alice"));
  assert_eq!(updated.audit.created_date, created.audit.created_date);
  assert_eq!(updated.audit.updated_by.as_deref(), Some("bob"));
}

#[tokio::test]
async fn update_rechecks_keys_against_other_records() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  let a = bps.create(partner("BP001", Some("111")), None).await.unwrap();
  bps.create(partner("BP002", Some("222")), None).await.unwrap();

  // Keeping its own registration number is fine.
  bps.update(a.bp_id.unwrap(), partner("BP001", Some("111")), None).await.unwrap();

  let err = bps
    .update(a.bp_id.unwrap(), partner("BP001", Some("222")), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn search_and_active_listing_order_by_name() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  let mut zeta = partner("BP001", None);
  zeta.bp_name = "Zeta Foods".into();
  let mut alpha = partner("BP002", None);
  alpha.bp_name = "alpha foods".into();
  let mut gone = partner("BP003", None);
  gone.bp_name = "Beta Foods".into();
  gone.status = PartnerStatus::Inactive;
  for bp in [zeta, alpha, gone] {
    bps.create(bp, None).await.unwrap();
  }

  let hits = bps.search_by_name("FOODS").await.unwrap();
  assert_eq!(hits.len(), 3);

  let active = bps.find_active(Some("FRANCHISOR")).await.unwrap();
  let names: Vec<_> = active.iter().map(|b| b.bp_name.as_str()).collect();
  // SQLite's default collation is byte order.
  assert_eq!(names, ["Zeta Foods", "alpha foods"]);
}

#[tokio::test]
async fn set_status_and_delete() {
  let s = store().await;
  let bps = engine::<Partner>(&s);

  let id = bps.create(partner("BP001", None), None).await.unwrap().bp_id.unwrap();
  let changed = bps
    .set_status(id, PartnerStatus::Inactive, Some("ops"))
    .await
    .unwrap();
  assert_eq!(changed.status, PartnerStatus::Inactive);
  assert_eq!(changed.audit.updated_by.as_deref(), Some("ops"));

  bps.delete(id).await.unwrap();
  assert!(matches!(bps.get(id).await, Err(Error::NotFound { .. })));
  assert!(matches!(bps.delete(id).await, Err(Error::NotFound { .. })));
}

// ─── Platforms ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn platform_capabilities_filter_and_partial_update() {
  let s = store().await;
  let pfs = engine::<Platform>(&s);

  let mk = |code: &str, name: &str, stores: bool| Platform {
    pf_id:           None,
    pf_code:         code.into(),
    pf_name:         name.into(),
    pf_description:  None,
    has_master_data: true,
    can_own_stores:  stores,
    can_franchise:   false,
    billing_capable: false,
    status:          Default::default(),
    audit:           Audit::default(),
  };
  let market = pfs.create(mk("PF01", "Market", true), None).await.unwrap();
  pfs.create(mk("PF02", "Delivery", false), None).await.unwrap();

  let owning = pfs
    .find_active_with(Capabilities { can_own_stores: Some(true), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(owning.len(), 1);
  assert_eq!(owning[0].pf_code, "PF01");

  let all = pfs.find_active_with(Capabilities::default()).await.unwrap();
  let names: Vec<_> = all.iter().map(|p| p.pf_name.as_str()).collect();
  assert_eq!(names, ["Delivery", "Market"]);

  let updated = pfs
    .update_capabilities(
      market.pf_id.unwrap(),
      Capabilities { billing_capable: Some(true), ..Default::default() },
      None,
    )
    .await
    .unwrap();
  assert!(updated.billing_capable);
  assert!(updated.can_own_stores);
  assert!(updated.has_master_data);
  assert_eq!(pfs.get(market.pf_id.unwrap()).await.unwrap(), updated);
}

// ─── Contracts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_active_contract_conflicts() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);

  contracts
    .create(contract("C1", "2024-01-01", Some("2024-06-30")), None)
    .await
    .unwrap();

  let err = contracts
    .create(contract("C2", "2024-06-01", Some("2024-12-31")), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)), "{err}");

  contracts
    .create(contract("C3", "2024-07-01", Some("2024-12-31")), None)
    .await
    .unwrap();

  // A different platform is a different scope.
  let mut other = contract("C4", "2024-03-01", None);
  other.pf_id = 11;
  contracts.create(other, None).await.unwrap();
}

#[tokio::test]
async fn overlap_ignores_inactive_contracts() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);

  let first = contracts
    .create(contract("C1", "2024-01-01", None), None)
    .await
    .unwrap();
  contracts
    .set_status(first.contract_id.unwrap(), ContractStatus::Expired, None)
    .await
    .unwrap();

  contracts
    .create(contract("C2", "2024-03-01", None), None)
    .await
    .unwrap();
}

#[tokio::test]
async fn overlap_check_standalone() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);
  contracts
    .create(contract("C1", "2024-01-01", Some("2024-06-30")), None)
    .await
    .unwrap();

  let hit = DateWindow::new(d("2024-06-30"), None);
  let miss = DateWindow::new(d("2024-07-01"), None);
  assert!(contracts.has_overlapping(1, 2, 10, hit).await.unwrap());
  assert!(!contracts.has_overlapping(1, 2, 10, miss).await.unwrap());
  assert!(!contracts.has_overlapping(2, 1, 10, hit).await.unwrap());
}

#[tokio::test]
async fn end_before_start_is_rejected() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);

  let err = contracts
    .create(contract("C1", "2024-06-30", Some("2024-01-01")), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidWindow { .. }));
}

#[tokio::test]
async fn update_may_not_create_an_overlap() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);

  let first = contracts
    .create(contract("C1", "2024-01-01", Some("2024-06-30")), None)
    .await
    .unwrap();
  contracts
    .create(contract("C2", "2024-07-01", None), None)
    .await
    .unwrap();

  // Shrinking its own window never conflicts with itself.
  contracts
    .update(
      first.contract_id.unwrap(),
      contract("C1", "2024-02-01", Some("2024-05-31")),
      None,
    )
    .await
    .unwrap();

  let err = contracts
    .update(
      first.contract_id.unwrap(),
      contract("C1", "2024-01-01", Some("2024-07-15")),
      None,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn terminated_contract_can_be_amended_beside_its_successor() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);

  let first = contracts
    .create(contract("C1", "2024-01-01", None), None)
    .await
    .unwrap();
  let id = first.contract_id.unwrap();
  contracts.close_window(id, Some(d("2024-06-30")), None).await.unwrap();
  contracts
    .create(contract("C2", "2024-03-01", None), None)
    .await
    .unwrap();

  let mut amended = contract("C1", "2024-01-01", Some("2024-06-30"));
  amended.status = ContractStatus::Terminated;
  amended.contract_terms = Some("amended".into());
  let updated = contracts.update(id, amended, None).await.unwrap();
  assert_eq!(updated.contract_terms.as_deref(), Some("amended"));
  assert_eq!(updated.status, ContractStatus::Terminated);

  // Reactivating it would overlap C2.
  let mut revived = contract("C1", "2024-01-01", Some("2024-06-30"));
  revived.status = ContractStatus::Active;
  let err = contracts.update(id, revived, None).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)), "{err}");
}

#[tokio::test]
async fn close_before_start_is_rejected() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);
  let id = contracts
    .create(contract("C1", "2024-06-01", None), None)
    .await
    .unwrap()
    .contract_id
    .unwrap();

  let err = contracts
    .close_window(id, Some(d("2024-01-01")), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidWindow { .. }), "{err}");

  let stored = contracts.get(id).await.unwrap();
  assert_eq!(stored.contract_end_date, None);
  assert_eq!(stored.status, ContractStatus::Active);
}

#[tokio::test]
async fn open_ended_contract_is_effective_from_its_start() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);
  contracts
    .create(contract("C1", "2024-01-01", None), None)
    .await
    .unwrap();

  assert!(contracts.find_effective_on(d("2023-12-31")).await.unwrap().is_empty());
  assert_eq!(contracts.find_effective_on(d("2024-01-01")).await.unwrap().len(), 1);
  assert_eq!(contracts.find_effective_on(d("2031-05-05")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn terminate_end_to_end() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);

  let created = contracts
    .create(contract("CONT001", "2024-01-01", None), Some("alice"))
    .await
    .unwrap();
  let id = created.contract_id.unwrap();

  let found = contracts
    .find_active_between(1, 2, 10, d("2024-06-15"))
    .await
    .unwrap();
  assert_eq!(found.map(|c| c.contract_id), Some(Some(id)));

  let terminated = contracts
    .close_window(id, Some(d("2024-06-30")), Some("bob"))
    .await
    .unwrap();
  assert_eq!(terminated.status, ContractStatus::Terminated);
  assert_eq!(terminated.contract_end_date, Some(d("2024-06-30")));

  // TERMINATED contracts are never effective, even inside their window.
  assert!(contracts.find_effective_on(d("2024-06-30")).await.unwrap().is_empty());
  assert!(contracts.find_effective_on(d("2024-07-01")).await.unwrap().is_empty());
  assert_eq!(contracts.get(id).await.unwrap().status, ContractStatus::Terminated);
}

#[tokio::test]
async fn close_window_twice_is_idempotent() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);
  let id = contracts
    .create(contract("C1", "2024-01-01", None), None)
    .await
    .unwrap()
    .contract_id
    .unwrap();

  let once = contracts.close_window(id, Some(d("2024-06-30")), None).await.unwrap();
  let twice = contracts.close_window(id, Some(d("2024-06-30")), None).await.unwrap();
  assert_eq!(once.contract_end_date, twice.contract_end_date);
  assert_eq!(once.status, twice.status);
}

#[tokio::test]
async fn active_contracts_for_either_party() {
  let s = store().await;
  let contracts = engine::<Contract>(&s);
  contracts.create(contract("C1", "2024-01-01", None), None).await.unwrap();
  let mut reversed = contract("C2", "2024-01-01", None);
  reversed.contractor_bp_id = 2;
  reversed.contractee_bp_id = 3;
  contracts.create(reversed, None).await.unwrap();

  assert_eq!(contracts.find_active_for_partner(2).await.unwrap().len(), 2);
  assert_eq!(contracts.find_active_for_partner(3).await.unwrap().len(), 1);
  assert!(contracts.find_active_for_partner(4).await.unwrap().is_empty());
}

#[tokio::test]
async fn overlap_trigger_guards_direct_inserts() {
  let s = store().await;
  RecordStore::<Contract>::save(&*s, contract("C1", "2024-01-01", None))
    .await
    .unwrap();

  let err = RecordStore::<Contract>::save(&*s, contract("C2", "2024-05-01", None))
    .await
    .unwrap_err();
  assert!(err.is_conflict(), "{err}");
}

// ─── Stores ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn store_closing_day_is_not_operating() {
  let s = store().await;
  let stores = engine::<StoreInfo>(&s);

  let id = stores
    .create(shop("S1", 1, Some("2024-01-01"), None), None)
    .await
    .unwrap()
    .store_id
    .unwrap();
  stores.create(shop("S2", 1, None, None), None).await.unwrap();

  assert_eq!(stores.find_operating(d("2024-03-01")).await.unwrap().len(), 1);

  let closed = stores.close_window(id, Some(d("2024-06-30")), None).await.unwrap();
  assert_eq!(closed.status, StoreStatus::Closed);
  assert_eq!(closed.closing_date, Some(d("2024-06-30")));

  // CLOSED stores drop out entirely; reopen to check the bound alone.
  stores.set_status(id, StoreStatus::Active, None).await.unwrap();
  assert_eq!(stores.find_operating(d("2024-06-29")).await.unwrap().len(), 1);
  assert!(stores.find_operating(d("2024-06-30")).await.unwrap().is_empty());
}

#[tokio::test]
async fn store_queries() {
  let s = store().await;
  let stores = engine::<StoreInfo>(&s);

  stores.create(shop("S1", 1, Some("2024-01-10"), None), None).await.unwrap();
  stores
    .create(shop("S2", 1, Some("2024-02-10"), Some("2024-03-31")), None)
    .await
    .unwrap();
  let mut inactive = shop("S3", 1, Some("2024-03-01"), None);
  inactive.status = StoreStatus::Inactive;
  stores.create(inactive, None).await.unwrap();
  stores.create(shop("S4", 2, None, None), None).await.unwrap();

  assert_eq!(stores.count_active_for_partner(1).await.unwrap(), 2);
  assert_eq!(stores.find_active_for_partner(2).await.unwrap().len(), 1);

  let opened = stores
    .find_opened_between(d("2024-01-10"), d("2024-02-10"))
    .await
    .unwrap();
  let codes: Vec<_> = opened.iter().map(|s| s.store_code.as_str()).collect();
  assert_eq!(codes, ["S1", "S2"]);

  let closed = stores
    .find_closed_between(d("2024-03-01"), d("2024-03-31"))
    .await
    .unwrap();
  assert_eq!(closed.len(), 1);

  assert_eq!(stores.search(StoreField::Address, "harbour").await.unwrap().len(), 4);
  assert_eq!(stores.search(StoreField::Name, "store s4").await.unwrap().len(), 1);

  assert!(stores.code_exists("S1").await.unwrap());
  assert!(stores.partner_code_exists(1, "S1").await.unwrap());
  assert!(!stores.partner_code_exists(2, "S1").await.unwrap());

  let err = stores.create(shop("S1", 2, None, None), None).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

// ─── Mappings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mapping_duplicates_treat_missing_target_as_a_value() {
  let s = store().await;
  let mappings = engine::<PlatformMapping>(&s);

  mappings.create(mapping(None, "2024-01-01"), None).await.unwrap();
  mappings.create(mapping(Some(5), "2024-01-01"), None).await.unwrap();

  let err = mappings.create(mapping(None, "2024-01-01"), None).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)), "{err}");
  let err = mappings.create(mapping(Some(5), "2024-01-01"), None).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));

  // Same scope, different effective date is not a duplicate.
  mappings.create(mapping(None, "2024-02-01"), None).await.unwrap();

  assert!(mappings.is_duplicate(1, 10, None, d("2024-01-01")).await.unwrap());
  assert!(!mappings.is_duplicate(1, 10, Some(6), d("2024-01-01")).await.unwrap());
}

#[tokio::test]
async fn mapping_unique_index_guards_direct_inserts() {
  let s = store().await;
  RecordStore::<PlatformMapping>::save(&*s, mapping(None, "2024-01-01"))
    .await
    .unwrap();
  let err = RecordStore::<PlatformMapping>::save(&*s, mapping(None, "2024-01-01"))
    .await
    .unwrap_err();
  assert!(err.is_conflict());
}

#[tokio::test]
async fn mapping_target_zero_is_not_a_missing_target() {
  let s = store().await;
  let mappings = engine::<PlatformMapping>(&s);

  mappings.create(mapping(None, "2024-01-01"), None).await.unwrap();
  mappings.create(mapping(Some(0), "2024-01-01"), None).await.unwrap();

  let err = RecordStore::<PlatformMapping>::save(&*s, mapping(Some(0), "2024-01-01"))
    .await
    .unwrap_err();
  assert!(err.is_conflict());
}

#[tokio::test]
async fn mapping_expire_and_effective() {
  let s = store().await;
  let mappings = engine::<PlatformMapping>(&s);

  let id = mappings
    .create(mapping(Some(5), "2024-01-01"), None)
    .await
    .unwrap()
    .mapping_id
    .unwrap();

  assert_eq!(
    mappings.find_effective_for_partner(1, d("2024-05-01")).await.unwrap().len(),
    1
  );
  assert!(mappings.find_effective_for_partner(2, d("2024-05-01")).await.unwrap().is_empty());

  let expired = mappings.close_window(id, Some(d("2024-06-30")), None).await.unwrap();
  assert_eq!(expired.status, MappingStatus::Expired);
  assert_eq!(expired.expiry_date, Some(d("2024-06-30")));
  assert!(mappings.find_effective_for_partner(1, d("2024-05-01")).await.unwrap().is_empty());

  assert_eq!(mappings.find_by_target(5).await.unwrap().len(), 1);
  assert_eq!(
    mappings.find_for_partner(1, Some(MappingStatus::Expired)).await.unwrap().len(),
    1
  );
  assert!(mappings.find_for_partner(1, Some(MappingStatus::Active)).await.unwrap().is_empty());
}

// ─── Permissions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn has_permission_respects_window_and_status() {
  let s = store().await;
  let perms = engine::<DataPermission>(&s);

  let id = perms
    .create(permission("2024-01-01", Some("2024-12-31")), None)
    .await
    .unwrap()
    .permission_id
    .unwrap();

  assert!(perms.has_permission(1, 2, "SALES", "READ", d("2024-12-31")).await.unwrap());
  assert!(!perms.has_permission(1, 2, "SALES", "READ", d("2025-01-01")).await.unwrap());
  assert!(!perms.has_permission(1, 2, "SALES", "WRITE", d("2024-06-01")).await.unwrap());
  assert!(!perms.has_permission(2, 1, "SALES", "READ", d("2024-06-01")).await.unwrap());

  let found = perms
    .find_effective_permission(1, 2, "SALES", d("2024-06-01"))
    .await
    .unwrap();
  assert_eq!(found.and_then(|p| p.permission_id), Some(id));

  perms.set_status(id, PermissionStatus::Inactive, None).await.unwrap();
  assert!(!perms.has_permission(1, 2, "SALES", "READ", d("2024-06-01")).await.unwrap());
  assert!(perms.find_active(1, 2, "SALES").await.unwrap().is_empty());
}

#[tokio::test]
async fn permission_exact_duplicate_conflicts() {
  let s = store().await;
  let perms = engine::<DataPermission>(&s);

  perms.create(permission("2024-01-01", None), None).await.unwrap();
  let err = perms.create(permission("2024-01-01", None), None).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));

  // Overlapping windows with a different start are allowed for permissions.
  perms.create(permission("2024-03-01", None), None).await.unwrap();
  assert!(perms.is_duplicate(1, 2, "SALES", d("2024-03-01")).await.unwrap());
  assert_eq!(perms.find_between(1, 2).await.unwrap().len(), 2);
  assert_eq!(perms.find_effective_on(d("2024-04-01")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn expire_defaults_to_today() {
  let s = store().await;
  let perms = engine::<DataPermission>(&s);
  let id = perms
    .create(permission("2020-01-01", None), None)
    .await
    .unwrap()
    .permission_id
    .unwrap();

  let expired = perms.close_window(id, None, None).await.unwrap();
  assert_eq!(expired.expiry_date, Some(bpm_core::window::today()));
  assert_eq!(expired.status, PermissionStatus::Expired);
  assert_eq!(expired.status(), PermissionStatus::Expired);
}
