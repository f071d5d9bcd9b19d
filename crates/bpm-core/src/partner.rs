//! Business partner master records (`bp_master`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  engine::LifecycleEngine,
  query::{Query, Value},
  record::{Audit, Policy, Record, ScopeRule, UniqueKey},
  status::{EntityKind, PartnerStatus, Status},
  store::RecordStore,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
  #[serde(default)]
  pub bp_id:               Option<i64>,
  pub bp_code:             String,
  pub bp_name:             String,
  pub bp_type:             String,
  pub business_reg_no:     Option<String>,
  pub representative_name: Option<String>,
  pub address:             Option<String>,
  pub phone_number:        Option<String>,
  pub email:               Option<String>,
  pub primary_pf_code:     Option<String>,
  #[serde(default)]
  pub status:              PartnerStatus,
  pub erp_usage_fee:       Option<Decimal>,
  pub commission_rate:     Option<Decimal>,
  #[serde(flatten)]
  pub audit:               Audit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerField {
  Id,
  Code,
  Name,
  Type,
  BusinessRegNo,
  PrimaryPfCode,
  Status,
}

impl Record for Partner {
  type Field = PartnerField;
  type Status = PartnerStatus;

  const KIND: EntityKind = EntityKind::Partner;
  const ID_FIELD: PartnerField = PartnerField::Id;
  const POLICY: Policy<PartnerField> = Policy {
    unique_keys: &[
      UniqueKey { fields: &[PartnerField::Code], label: "BP code" },
      UniqueKey {
        fields: &[PartnerField::BusinessRegNo],
        label:  "business registration number",
      },
    ],
    scope_rule:  ScopeRule::None,
    window:      None,
    status:      PartnerField::Status,
    order_by:    Some(PartnerField::Id),
  };

  fn id(&self) -> Option<i64> { self.bp_id }

  fn set_id(&mut self, id: Option<i64>) { self.bp_id = id; }

  fn status(&self) -> PartnerStatus { self.status }

  fn set_status(&mut self, status: PartnerStatus) { self.status = status; }

  fn value(&self, field: PartnerField) -> Value {
    match field {
      PartnerField::Id => self.bp_id.into(),
      PartnerField::Code => self.bp_code.as_str().into(),
      PartnerField::Name => self.bp_name.as_str().into(),
      PartnerField::Type => self.bp_type.as_str().into(),
      PartnerField::BusinessRegNo => self.business_reg_no.as_deref().into(),
      PartnerField::PrimaryPfCode => self.primary_pf_code.as_deref().into(),
      PartnerField::Status => self.status.as_str().into(),
    }
  }

  fn apply_update(&mut self, changes: Self) {
    self.bp_name = changes.bp_name;
    self.bp_type = changes.bp_type;
    self.business_reg_no = changes.business_reg_no;
    self.representative_name = changes.representative_name;
    self.address = changes.address;
    self.phone_number = changes.phone_number;
    self.email = changes.email;
    self.primary_pf_code = changes.primary_pf_code;
    self.status = changes.status;
    self.erp_usage_fee = changes.erp_usage_fee;
    self.commission_rate = changes.commission_rate;
  }

  fn audit(&self) -> &Audit { &self.audit }

  fn audit_mut(&mut self) -> &mut Audit { &mut self.audit }
}

impl<S: RecordStore<Partner>> LifecycleEngine<Partner, S> {
  pub async fn find_by_code(&self, code: &str) -> Result<Partner> {
    self.find_one(PartnerField::Code, code).await
  }

  /// ACTIVE partners, optionally of one type, by name.
  pub async fn find_active(&self, bp_type: Option<&str>) -> Result<Vec<Partner>> {
    let query = Query::new()
      .eq(PartnerField::Status, PartnerStatus::Active.as_str())
      .eq_opt(PartnerField::Type, bp_type)
      .order_by(PartnerField::Name);
    self.list(query).await
  }

  pub async fn search_by_name(&self, name: &str) -> Result<Vec<Partner>> {
    let query = Query::new()
      .contains(PartnerField::Name, name)
      .order_by(PartnerField::Name);
    self.list(query).await
  }

  pub async fn code_exists(&self, code: &str) -> Result<bool> {
    self.exists_matching(&[(PartnerField::Code, code.into())]).await
  }

  pub async fn business_reg_no_exists(&self, reg_no: &str) -> Result<bool> {
    self
      .exists_matching(&[(PartnerField::BusinessRegNo, reg_no.into())])
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserializes_camel_case_with_defaults() {
    let bp: Partner = serde_json::from_str(
      r#"{"bpCode":"BP001","bpName":"Acme","bpType":"CORP","erpUsageFee":"12.50","createdBy":"alice"}"#,
    )
    .unwrap();
    assert_eq!(bp.bp_id, None);
    assert_eq!(bp.status, PartnerStatus::Active);
    assert_eq!(bp.erp_usage_fee, Some(Decimal::new(1250, 2)));
    assert_eq!(bp.audit.created_by.as_deref(), Some("alice"));
    assert_eq!(bp.value(PartnerField::BusinessRegNo), Value::Null);
  }
}
