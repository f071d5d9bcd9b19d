//! Contracts between two partners on a platform (`bp_contract_info`).
//!
//! Within one (contractor, contractee, platform) scope, ACTIVE contracts may
//! not have intersecting windows. A contract's last day is still effective.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  engine::LifecycleEngine,
  query::{Predicate, Query, Value},
  record::{Audit, Policy, Record, ScopeRule, UniqueKey, Windowed},
  status::{ContractStatus, EntityKind, Status},
  store::RecordStore,
  window::{DateWindow, EndBound, WindowFields},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
  #[serde(default)]
  pub contract_id:         Option<i64>,
  pub contract_code:       String,
  pub contractor_bp_id:    i64,
  pub contractee_bp_id:    i64,
  pub contract_type:       String,
  pub pf_id:               i64,
  pub contract_start_date: NaiveDate,
  pub contract_end_date:   Option<NaiveDate>,
  pub contract_terms:      Option<String>,
  pub fee_rate:            Option<Decimal>,
  #[serde(default)]
  pub status:              ContractStatus,
  #[serde(flatten)]
  pub audit:               Audit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractField {
  Id,
  Code,
  ContractorBpId,
  ContracteeBpId,
  Type,
  PfId,
  StartDate,
  EndDate,
  Status,
}

impl Record for Contract {
  type Field = ContractField;
  type Status = ContractStatus;

  const KIND: EntityKind = EntityKind::Contract;
  const ID_FIELD: ContractField = ContractField::Id;
  const POLICY: Policy<ContractField> = Policy {
    unique_keys: &[UniqueKey {
      fields: &[ContractField::Code],
      label:  "contract code",
    }],
    scope_rule:  ScopeRule::OverlapExclusion {
      scope: &[
        ContractField::ContractorBpId,
        ContractField::ContracteeBpId,
        ContractField::PfId,
      ],
    },
    window:      Some(WindowFields {
      start: ContractField::StartDate,
      end:   ContractField::EndDate,
      bound: EndBound::Inclusive,
    }),
    status:      ContractField::Status,
    order_by:    Some(ContractField::Id),
  };

  fn id(&self) -> Option<i64> { self.contract_id }

  fn set_id(&mut self, id: Option<i64>) { self.contract_id = id; }

  fn status(&self) -> ContractStatus { self.status }

  fn set_status(&mut self, status: ContractStatus) { self.status = status; }

  fn value(&self, field: ContractField) -> Value {
    match field {
      ContractField::Id => self.contract_id.into(),
      ContractField::Code => self.contract_code.as_str().into(),
      ContractField::ContractorBpId => self.contractor_bp_id.into(),
      ContractField::ContracteeBpId => self.contractee_bp_id.into(),
      ContractField::Type => self.contract_type.as_str().into(),
      ContractField::PfId => self.pf_id.into(),
      ContractField::StartDate => self.contract_start_date.into(),
      ContractField::EndDate => self.contract_end_date.into(),
      ContractField::Status => self.status.as_str().into(),
    }
  }

  fn window(&self) -> Option<DateWindow> {
    Some(DateWindow::new(self.contract_start_date, self.contract_end_date))
  }

  fn apply_update(&mut self, changes: Self) {
    self.contractor_bp_id = changes.contractor_bp_id;
    self.contractee_bp_id = changes.contractee_bp_id;
    self.contract_type = changes.contract_type;
    self.pf_id = changes.pf_id;
    self.contract_start_date = changes.contract_start_date;
    self.contract_end_date = changes.contract_end_date;
    self.contract_terms = changes.contract_terms;
    self.fee_rate = changes.fee_rate;
    self.status = changes.status;
  }

  fn audit(&self) -> &Audit { &self.audit }

  fn audit_mut(&mut self) -> &mut Audit { &mut self.audit }
}

impl Windowed for Contract {
  const TERMINAL: ContractStatus = ContractStatus::Terminated;

  fn set_window_end(&mut self, end: NaiveDate) {
    self.contract_end_date = Some(end);
  }
}

fn scope(contractor: i64, contractee: i64, pf_id: i64) -> [(ContractField, Value); 3] {
  [
    (ContractField::ContractorBpId, contractor.into()),
    (ContractField::ContracteeBpId, contractee.into()),
    (ContractField::PfId, pf_id.into()),
  ]
}

impl<S: RecordStore<Contract>> LifecycleEngine<Contract, S> {
  pub async fn find_by_code(&self, code: &str) -> Result<Contract> {
    self.find_one(ContractField::Code, code).await
  }

  /// ACTIVE contracts where the partner is either party.
  pub async fn find_active_for_partner(&self, bp_id: i64) -> Result<Vec<Contract>> {
    let query = Query::new()
      .any(vec![
        Predicate::eq(ContractField::ContractorBpId, bp_id),
        Predicate::eq(ContractField::ContracteeBpId, bp_id),
      ])
      .eq(ContractField::Status, ContractStatus::Active.as_str());
    self.list(query).await
  }

  /// Every ACTIVE contract effective on `date`, across all scopes.
  pub async fn find_effective_on(&self, date: NaiveDate) -> Result<Vec<Contract>> {
    self.find_effective(&[], date).await
  }

  /// The ACTIVE contract between the three parties effective on `date`.
  pub async fn find_active_between(
    &self,
    contractor: i64,
    contractee: i64,
    pf_id: i64,
    date: NaiveDate,
  ) -> Result<Option<Contract>> {
    let query = self
      .effective(&scope(contractor, contractee, pf_id), date)?
      .limit(1);
    Ok(self.list(query).await?.into_iter().next())
  }

  pub async fn code_exists(&self, code: &str) -> Result<bool> {
    self.exists_matching(&[(ContractField::Code, code.into())]).await
  }

  pub async fn has_overlapping(
    &self,
    contractor: i64,
    contractee: i64,
    pf_id: i64,
    window: DateWindow,
  ) -> Result<bool> {
    self
      .exists_overlapping(&scope(contractor, contractee, pf_id), window)
      .await
  }
}
