//! Partner-to-platform mappings (`bp_pf_mapping`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  engine::LifecycleEngine,
  query::{Query, Value},
  record::{Audit, Policy, Record, ScopeRule, Windowed},
  status::{EntityKind, MappingStatus, Status},
  store::RecordStore,
  window::{DateWindow, EndBound, WindowFields},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMapping {
  #[serde(default)]
  pub mapping_id:     Option<i64>,
  pub bp_id:          i64,
  pub pf_id:          i64,
  pub target_bp_id:   Option<i64>,
  pub parent_bp_id:   Option<i64>,
  pub mapping_type:   String,
  pub effective_date: NaiveDate,
  pub expiry_date:    Option<NaiveDate>,
  #[serde(default)]
  pub status:         MappingStatus,
  #[serde(flatten)]
  pub audit:          Audit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingField {
  Id,
  BpId,
  PfId,
  TargetBpId,
  ParentBpId,
  Type,
  EffectiveDate,
  ExpiryDate,
  Status,
}

impl Record for PlatformMapping {
  type Field = MappingField;
  type Status = MappingStatus;

  const KIND: EntityKind = EntityKind::PlatformMapping;
  const ID_FIELD: MappingField = MappingField::Id;
  const POLICY: Policy<MappingField> = Policy {
    unique_keys: &[],
    scope_rule:  ScopeRule::ExactDuplicate {
      fields: &[
        MappingField::BpId,
        MappingField::PfId,
        MappingField::TargetBpId,
        MappingField::EffectiveDate,
      ],
    },
    window:      Some(WindowFields {
      start: MappingField::EffectiveDate,
      end:   MappingField::ExpiryDate,
      bound: EndBound::Inclusive,
    }),
    status:      MappingField::Status,
    order_by:    Some(MappingField::Id),
  };

  fn id(&self) -> Option<i64> { self.mapping_id }

  fn set_id(&mut self, id: Option<i64>) { self.mapping_id = id; }

  fn status(&self) -> MappingStatus { self.status }

  fn set_status(&mut self, status: MappingStatus) { self.status = status; }

  fn value(&self, field: MappingField) -> Value {
    match field {
      MappingField::Id => self.mapping_id.into(),
      MappingField::BpId => self.bp_id.into(),
      MappingField::PfId => self.pf_id.into(),
      MappingField::TargetBpId => self.target_bp_id.into(),
      MappingField::ParentBpId => self.parent_bp_id.into(),
      MappingField::Type => self.mapping_type.as_str().into(),
      MappingField::EffectiveDate => self.effective_date.into(),
      MappingField::ExpiryDate => self.expiry_date.into(),
      MappingField::Status => self.status.as_str().into(),
    }
  }

  fn window(&self) -> Option<DateWindow> {
    Some(DateWindow::new(self.effective_date, self.expiry_date))
  }

  fn apply_update(&mut self, changes: Self) {
    self.bp_id = changes.bp_id;
    self.pf_id = changes.pf_id;
    self.target_bp_id = changes.target_bp_id;
    self.parent_bp_id = changes.parent_bp_id;
    self.mapping_type = changes.mapping_type;
    self.effective_date = changes.effective_date;
    self.expiry_date = changes.expiry_date;
    self.status = changes.status;
  }

  fn audit(&self) -> &Audit { &self.audit }

  fn audit_mut(&mut self) -> &mut Audit { &mut self.audit }
}

impl Windowed for PlatformMapping {
  const TERMINAL: MappingStatus = MappingStatus::Expired;

  fn set_window_end(&mut self, end: NaiveDate) { self.expiry_date = Some(end); }
}

impl<S: RecordStore<PlatformMapping>> LifecycleEngine<PlatformMapping, S> {
  pub async fn find_for_partner(
    &self,
    bp_id: i64,
    status: Option<MappingStatus>,
  ) -> Result<Vec<PlatformMapping>> {
    let query = Query::new()
      .eq(MappingField::BpId, bp_id)
      .eq_opt(MappingField::Status, status.map(Status::as_str));
    self.list(query).await
  }

  pub async fn find_for_partner_platform(
    &self,
    bp_id: i64,
    pf_id: i64,
  ) -> Result<Vec<PlatformMapping>> {
    let query = Query::new()
      .eq(MappingField::BpId, bp_id)
      .eq(MappingField::PfId, pf_id);
    self.list(query).await
  }

  pub async fn find_by_target(&self, target_bp_id: i64) -> Result<Vec<PlatformMapping>> {
    self.list(Query::new().eq(MappingField::TargetBpId, target_bp_id)).await
  }

  pub async fn find_by_parent(&self, parent_bp_id: i64) -> Result<Vec<PlatformMapping>> {
    self.list(Query::new().eq(MappingField::ParentBpId, parent_bp_id)).await
  }

  /// ACTIVE mappings of the partner effective on `date`.
  pub async fn find_effective_for_partner(
    &self,
    bp_id: i64,
    date: NaiveDate,
  ) -> Result<Vec<PlatformMapping>> {
    self.find_effective(&[(MappingField::BpId, bp_id.into())], date).await
  }

  /// Whether a mapping with this exact scope and effective date exists. A
  /// missing target only matches mappings without a target.
  pub async fn is_duplicate(
    &self,
    bp_id: i64,
    pf_id: i64,
    target_bp_id: Option<i64>,
    effective_date: NaiveDate,
  ) -> Result<bool> {
    self
      .exists_matching(&[
        (MappingField::BpId, bp_id.into()),
        (MappingField::PfId, pf_id.into()),
        (MappingField::TargetBpId, target_bp_id.into()),
        (MappingField::EffectiveDate, effective_date.into()),
      ])
      .await
  }
}
