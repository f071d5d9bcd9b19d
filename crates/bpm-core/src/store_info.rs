//! Stores owned by a partner (`bp_store_info`).
//!
//! A store operates from its opening date up to, but not on, its closing
//! date. Stores without an opening date never operate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  engine::LifecycleEngine,
  query::{Query, Value},
  record::{Audit, Policy, Record, ScopeRule, UniqueKey, Windowed},
  status::{EntityKind, Status, StoreStatus},
  store::RecordStore,
  window::{DateWindow, EndBound, WindowFields},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
  #[serde(default)]
  pub store_id:     Option<i64>,
  pub store_code:   String,
  pub bp_id:        i64,
  pub store_name:   String,
  pub store_type:   Option<String>,
  pub address:      Option<String>,
  pub phone_number: Option<String>,
  pub manager_name: Option<String>,
  pub opening_date: Option<NaiveDate>,
  pub closing_date: Option<NaiveDate>,
  #[serde(default)]
  pub status:       StoreStatus,
  #[serde(flatten)]
  pub audit:        Audit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreField {
  Id,
  Code,
  BpId,
  Name,
  Type,
  Address,
  ManagerName,
  OpeningDate,
  ClosingDate,
  Status,
}

impl Record for StoreInfo {
  type Field = StoreField;
  type Status = StoreStatus;

  const KIND: EntityKind = EntityKind::Store;
  const ID_FIELD: StoreField = StoreField::Id;
  const POLICY: Policy<StoreField> = Policy {
    unique_keys: &[
      UniqueKey { fields: &[StoreField::Code], label: "store code" },
      UniqueKey {
        fields: &[StoreField::BpId, StoreField::Code],
        label:  "BP store code",
      },
    ],
    scope_rule:  ScopeRule::None,
    window:      Some(WindowFields {
      start: StoreField::OpeningDate,
      end:   StoreField::ClosingDate,
      bound: EndBound::Exclusive,
    }),
    status:      StoreField::Status,
    order_by:    Some(StoreField::Id),
  };

  fn id(&self) -> Option<i64> { self.store_id }

  fn set_id(&mut self, id: Option<i64>) { self.store_id = id; }

  fn status(&self) -> StoreStatus { self.status }

  fn set_status(&mut self, status: StoreStatus) { self.status = status; }

  fn value(&self, field: StoreField) -> Value {
    match field {
      StoreField::Id => self.store_id.into(),
      StoreField::Code => self.store_code.as_str().into(),
      StoreField::BpId => self.bp_id.into(),
      StoreField::Name => self.store_name.as_str().into(),
      StoreField::Type => self.store_type.as_deref().into(),
      StoreField::Address => self.address.as_deref().into(),
      StoreField::ManagerName => self.manager_name.as_deref().into(),
      StoreField::OpeningDate => self.opening_date.into(),
      StoreField::ClosingDate => self.closing_date.into(),
      StoreField::Status => self.status.as_str().into(),
    }
  }

  fn window(&self) -> Option<DateWindow> {
    self
      .opening_date
      .map(|start| DateWindow::new(start, self.closing_date))
  }

  fn apply_update(&mut self, changes: Self) {
    self.bp_id = changes.bp_id;
    self.store_name = changes.store_name;
    self.store_type = changes.store_type;
    self.address = changes.address;
    self.phone_number = changes.phone_number;
    self.manager_name = changes.manager_name;
    self.opening_date = changes.opening_date;
    self.closing_date = changes.closing_date;
    self.status = changes.status;
  }

  fn audit(&self) -> &Audit { &self.audit }

  fn audit_mut(&mut self) -> &mut Audit { &mut self.audit }
}

impl Windowed for StoreInfo {
  const TERMINAL: StoreStatus = StoreStatus::Closed;

  fn set_window_end(&mut self, end: NaiveDate) { self.closing_date = Some(end); }
}

impl<S: RecordStore<StoreInfo>> LifecycleEngine<StoreInfo, S> {
  pub async fn find_by_code(&self, code: &str) -> Result<StoreInfo> {
    self.find_one(StoreField::Code, code).await
  }

  fn active_of(bp_id: i64) -> Query<StoreField> {
    Query::new()
      .eq(StoreField::BpId, bp_id)
      .eq(StoreField::Status, StoreStatus::Active.as_str())
  }

  pub async fn find_active_for_partner(&self, bp_id: i64) -> Result<Vec<StoreInfo>> {
    self.list(Self::active_of(bp_id)).await
  }

  pub async fn count_active_for_partner(&self, bp_id: i64) -> Result<u64> {
    self.count(&Self::active_of(bp_id)).await
  }

  /// Case-insensitive substring search on one of the text fields.
  pub async fn search(&self, field: StoreField, needle: &str) -> Result<Vec<StoreInfo>> {
    self.list(Query::new().contains(field, needle)).await
  }

  /// ACTIVE stores operating on `date`.
  pub async fn find_operating(&self, date: NaiveDate) -> Result<Vec<StoreInfo>> {
    self.find_effective(&[], date).await
  }

  pub async fn find_opened_between(
    &self,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<Vec<StoreInfo>> {
    let query = Query::new()
      .between(StoreField::OpeningDate, from, to)
      .order_by(StoreField::OpeningDate);
    self.list(query).await
  }

  pub async fn find_closed_between(
    &self,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<Vec<StoreInfo>> {
    let query = Query::new()
      .between(StoreField::ClosingDate, from, to)
      .order_by(StoreField::ClosingDate);
    self.list(query).await
  }

  pub async fn code_exists(&self, code: &str) -> Result<bool> {
    self.exists_matching(&[(StoreField::Code, code.into())]).await
  }

  pub async fn partner_code_exists(&self, bp_id: i64, code: &str) -> Result<bool> {
    self
      .exists_matching(&[(StoreField::BpId, bp_id.into()), (StoreField::Code, code.into())])
      .await
  }
}
