//! Data-sharing permissions granted by one partner to another
//! (`bp_master_data_permission`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  engine::LifecycleEngine,
  query::{Query, Value},
  record::{Audit, Policy, Record, ScopeRule, Windowed},
  status::{EntityKind, PermissionStatus, Status},
  store::RecordStore,
  window::{DateWindow, EndBound, WindowFields},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPermission {
  #[serde(default)]
  pub permission_id:   Option<i64>,
  pub owner_bp_id:     i64,
  pub user_bp_id:      i64,
  pub data_type:       String,
  pub permission_type: String,
  pub effective_date:  NaiveDate,
  pub expiry_date:     Option<NaiveDate>,
  #[serde(default)]
  pub status:          PermissionStatus,
  #[serde(flatten)]
  pub audit:           Audit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionField {
  Id,
  OwnerBpId,
  UserBpId,
  DataType,
  PermissionType,
  EffectiveDate,
  ExpiryDate,
  Status,
}

impl Record for DataPermission {
  type Field = PermissionField;
  type Status = PermissionStatus;

  const KIND: EntityKind = EntityKind::DataPermission;
  const ID_FIELD: PermissionField = PermissionField::Id;
  const POLICY: Policy<PermissionField> = Policy {
    unique_keys: &[],
    scope_rule:  ScopeRule::ExactDuplicate {
      fields: &[
        PermissionField::OwnerBpId,
        PermissionField::UserBpId,
        PermissionField::DataType,
        PermissionField::EffectiveDate,
      ],
    },
    window:      Some(WindowFields {
      start: PermissionField::EffectiveDate,
      end:   PermissionField::ExpiryDate,
      bound: EndBound::Inclusive,
    }),
    status:      PermissionField::Status,
    order_by:    Some(PermissionField::Id),
  };

  fn id(&self) -> Option<i64> { self.permission_id }

  fn set_id(&mut self, id: Option<i64>) { self.permission_id = id; }

  fn status(&self) -> PermissionStatus { self.status }

  fn set_status(&mut self, status: PermissionStatus) { self.status = status; }

  fn value(&self, field: PermissionField) -> Value {
    match field {
      PermissionField::Id => self.permission_id.into(),
      PermissionField::OwnerBpId => self.owner_bp_id.into(),
      PermissionField::UserBpId => self.user_bp_id.into(),
      PermissionField::DataType => self.data_type.as_str().into(),
      PermissionField::PermissionType => self.permission_type.as_str().into(),
      PermissionField::EffectiveDate => self.effective_date.into(),
      PermissionField::ExpiryDate => self.expiry_date.into(),
      PermissionField::Status => self.status.as_str().into(),
    }
  }

  fn window(&self) -> Option<DateWindow> {
    Some(DateWindow::new(self.effective_date, self.expiry_date))
  }

  fn apply_update(&mut self, changes: Self) {
    self.owner_bp_id = changes.owner_bp_id;
    self.user_bp_id = changes.user_bp_id;
    self.data_type = changes.data_type;
    self.permission_type = changes.permission_type;
    self.effective_date = changes.effective_date;
    self.expiry_date = changes.expiry_date;
    self.status = changes.status;
  }

  fn audit(&self) -> &Audit { &self.audit }

  fn audit_mut(&mut self) -> &mut Audit { &mut self.audit }
}

impl Windowed for DataPermission {
  const TERMINAL: PermissionStatus = PermissionStatus::Expired;

  fn set_window_end(&mut self, end: NaiveDate) { self.expiry_date = Some(end); }
}

fn scope(owner: i64, user: i64, data_type: &str) -> [(PermissionField, Value); 3] {
  [
    (PermissionField::OwnerBpId, owner.into()),
    (PermissionField::UserBpId, user.into()),
    (PermissionField::DataType, data_type.into()),
  ]
}

impl<S: RecordStore<DataPermission>> LifecycleEngine<DataPermission, S> {
  pub async fn find_between(
    &self,
    owner: i64,
    user: i64,
  ) -> Result<Vec<DataPermission>> {
    let query = Query::new()
      .eq(PermissionField::OwnerBpId, owner)
      .eq(PermissionField::UserBpId, user);
    self.list(query).await
  }

  /// ACTIVE permissions for the scope, regardless of date.
  pub async fn find_active(
    &self,
    owner: i64,
    user: i64,
    data_type: &str,
  ) -> Result<Vec<DataPermission>> {
    let query = scope(owner, user, data_type)
      .into_iter()
      .fold(Query::new(), |q, (field, value)| q.eq(field, value))
      .eq(PermissionField::Status, PermissionStatus::Active.as_str());
    self.list(query).await
  }

  /// The ACTIVE permission for the scope effective on `date`, if any.
  pub async fn find_effective_permission(
    &self,
    owner: i64,
    user: i64,
    data_type: &str,
    date: NaiveDate,
  ) -> Result<Option<DataPermission>> {
    let query = self.effective(&scope(owner, user, data_type), date)?.limit(1);
    Ok(self.list(query).await?.into_iter().next())
  }

  pub async fn find_effective_on(&self, date: NaiveDate) -> Result<Vec<DataPermission>> {
    self.find_effective(&[], date).await
  }

  /// Whether `user` may access `owner`'s `data_type` data with
  /// `permission_type` on `date`.
  pub async fn has_permission(
    &self,
    owner: i64,
    user: i64,
    data_type: &str,
    permission_type: &str,
    date: NaiveDate,
  ) -> Result<bool> {
    let query = self
      .effective(&scope(owner, user, data_type), date)?
      .eq(PermissionField::PermissionType, permission_type);
    self.exists(&query).await
  }

  pub async fn is_duplicate(
    &self,
    owner: i64,
    user: i64,
    data_type: &str,
    effective_date: NaiveDate,
  ) -> Result<bool> {
    let [a, b, c] = scope(owner, user, data_type);
    self
      .exists_matching(&[a, b, c, (PermissionField::EffectiveDate, effective_date.into())])
      .await
  }
}
