//! Platform code master (`pf_code_master`): the platforms partners, contracts
//! and mappings refer to, with their capability flags.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  Error, Result,
  engine::LifecycleEngine,
  query::{Query, Value},
  record::{Audit, Policy, Record, ScopeRule, UniqueKey},
  status::{EntityKind, PlatformStatus, Status},
  store::RecordStore,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
  #[serde(default)]
  pub pf_id:           Option<i64>,
  pub pf_code:         String,
  pub pf_name:         String,
  pub pf_description:  Option<String>,
  #[serde(default)]
  pub has_master_data: bool,
  #[serde(default)]
  pub can_own_stores:  bool,
  #[serde(default)]
  pub can_franchise:   bool,
  #[serde(default)]
  pub billing_capable: bool,
  #[serde(default)]
  pub status:          PlatformStatus,
  #[serde(flatten)]
  pub audit:           Audit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformField {
  Id,
  Code,
  Name,
  HasMasterData,
  CanOwnStores,
  CanFranchise,
  BillingCapable,
  Status,
}

/// A partial set of capability flags. `None` leaves a flag unchanged when
/// updating, and unconstrained when filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
  pub has_master_data: Option<bool>,
  pub can_own_stores:  Option<bool>,
  pub can_franchise:   Option<bool>,
  pub billing_capable: Option<bool>,
}

impl Capabilities {
  fn pairs(&self) -> [(PlatformField, Option<bool>); 4] {
    [
      (PlatformField::HasMasterData, self.has_master_data),
      (PlatformField::CanOwnStores, self.can_own_stores),
      (PlatformField::CanFranchise, self.can_franchise),
      (PlatformField::BillingCapable, self.billing_capable),
    ]
  }
}

impl Record for Platform {
  type Field = PlatformField;
  type Status = PlatformStatus;

  const KIND: EntityKind = EntityKind::Platform;
  const ID_FIELD: PlatformField = PlatformField::Id;
  const POLICY: Policy<PlatformField> = Policy {
    unique_keys: &[UniqueKey { fields: &[PlatformField::Code], label: "PF code" }],
    scope_rule:  ScopeRule::None,
    window:      None,
    status:      PlatformField::Status,
    order_by:    Some(PlatformField::Id),
  };

  fn id(&self) -> Option<i64> { self.pf_id }

  fn set_id(&mut self, id: Option<i64>) { self.pf_id = id; }

  fn status(&self) -> PlatformStatus { self.status }

  fn set_status(&mut self, status: PlatformStatus) { self.status = status; }

  fn value(&self, field: PlatformField) -> Value {
    match field {
      PlatformField::Id => self.pf_id.into(),
      PlatformField::Code => self.pf_code.as_str().into(),
      PlatformField::Name => self.pf_name.as_str().into(),
      PlatformField::HasMasterData => self.has_master_data.into(),
      PlatformField::CanOwnStores => self.can_own_stores.into(),
      PlatformField::CanFranchise => self.can_franchise.into(),
      PlatformField::BillingCapable => self.billing_capable.into(),
      PlatformField::Status => self.status.as_str().into(),
    }
  }

  fn apply_update(&mut self, changes: Self) {
    self.pf_name = changes.pf_name;
    self.pf_description = changes.pf_description;
    self.has_master_data = changes.has_master_data;
    self.can_own_stores = changes.can_own_stores;
    self.can_franchise = changes.can_franchise;
    self.billing_capable = changes.billing_capable;
    self.status = changes.status;
  }

  fn audit(&self) -> &Audit { &self.audit }

  fn audit_mut(&mut self) -> &mut Audit { &mut self.audit }
}

impl<S: RecordStore<Platform>> LifecycleEngine<Platform, S> {
  pub async fn find_by_code(&self, code: &str) -> Result<Platform> {
    self.find_one(PlatformField::Code, code).await
  }

  /// ACTIVE platforms by name, restricted to those whose flags equal every
  /// flag given in `filter`.
  pub async fn find_active_with(
    &self,
    filter: Capabilities,
  ) -> Result<Vec<Platform>> {
    let query = filter
      .pairs()
      .into_iter()
      .fold(Query::new(), |q, (field, flag)| q.eq_opt(field, flag))
      .eq(PlatformField::Status, PlatformStatus::Active.as_str())
      .order_by(PlatformField::Name);
    self.list(query).await
  }

  pub async fn search_by_name(&self, name: &str) -> Result<Vec<Platform>> {
    let query = Query::new()
      .contains(PlatformField::Name, name)
      .order_by(PlatformField::Name);
    self.list(query).await
  }

  pub async fn code_exists(&self, code: &str) -> Result<bool> {
    self.exists_matching(&[(PlatformField::Code, code.into())]).await
  }

  /// Change only the flags present in `changes`.
  pub async fn update_capabilities(
    &self,
    id: i64,
    changes: Capabilities,
    actor: Option<&str>,
  ) -> Result<Platform> {
    let mut platform = self.get(id).await?;
    let Capabilities { has_master_data, can_own_stores, can_franchise, billing_capable } =
      changes;
    if let Some(v) = has_master_data {
      platform.has_master_data = v;
    }
    if let Some(v) = can_own_stores {
      platform.can_own_stores = v;
    }
    if let Some(v) = can_franchise {
      platform.can_franchise = v;
    }
    if let Some(v) = billing_capable {
      platform.billing_capable = v;
    }
    platform.audit.stamp_updated(actor, Utc::now());
    let saved =
      self.gateway().save(platform).await.map_err(Error::gateway)?;
    info!(kind = %Platform::KIND, id, "capabilities updated");
    Ok(saved)
  }
}
