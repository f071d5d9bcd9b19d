//! The shape every managed record shares, and the per-kind policy tables the
//! [`LifecycleEngine`](crate::engine::LifecycleEngine) is driven by.

use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
  query::Value,
  status::{EntityKind, Status},
  window::{DateWindow, WindowFields},
};

// ─── Audit ───────────────────────────────────────────────────────────────────

/// Creation and last-update stamps. Timestamps are always set by the engine;
/// whatever a client sends for them is overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Audit {
  pub created_date: Option<DateTime<Utc>>,
  pub created_by:   Option<String>,
  pub updated_date: Option<DateTime<Utc>>,
  pub updated_by:   Option<String>,
}

impl Audit {
  pub fn stamp_created(&mut self, actor: Option<&str>, at: DateTime<Utc>) {
    self.created_date = Some(at);
    self.created_by = actor.map(str::to_owned);
    self.stamp_updated(actor, at);
  }

  pub fn stamp_updated(&mut self, actor: Option<&str>, at: DateTime<Utc>) {
    self.updated_date = Some(at);
    self.updated_by = actor.map(str::to_owned);
  }
}

// ─── Policy ──────────────────────────────────────────────────────────────────

/// A set of fields whose combined value must be unique across a kind.
#[derive(Debug, Clone, Copy)]
pub struct UniqueKey<F: 'static> {
  pub fields: &'static [F],
  /// Human label used in conflict messages, e.g. `"BP code"`.
  pub label:  &'static str,
}

/// How a record's scope keys and window constrain its neighbours.
#[derive(Debug, Clone, Copy)]
pub enum ScopeRule<F: 'static> {
  None,
  /// No two ACTIVE records in the same scope may have intersecting windows.
  OverlapExclusion { scope: &'static [F] },
  /// No two records may agree on every listed field. A null value only
  /// matches another null.
  ExactDuplicate { fields: &'static [F] },
}

#[derive(Debug, Clone, Copy)]
pub struct Policy<F: 'static> {
  pub unique_keys: &'static [UniqueKey<F>],
  pub scope_rule:  ScopeRule<F>,
  pub window:      Option<WindowFields<F>>,
  pub status:      F,
  /// Default ascending sort for list queries.
  pub order_by:    Option<F>,
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A managed master-data record.
pub trait Record:
  Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
  /// The queryable fields of this kind.
  type Field: Copy + Debug + Eq + Send + Sync + 'static;
  type Status: Status;

  const KIND: EntityKind;
  const ID_FIELD: Self::Field;
  const POLICY: Policy<Self::Field>;

  fn id(&self) -> Option<i64>;
  fn set_id(&mut self, id: Option<i64>);

  fn status(&self) -> Self::Status;
  fn set_status(&mut self, status: Self::Status);

  /// The current value of `field`, as compared by queries.
  fn value(&self, field: Self::Field) -> Value;

  /// The record's effective window, if it has a start date.
  fn window(&self) -> Option<DateWindow> { None }

  /// Copy every mutable field from `changes`. Identity, business keys and
  /// audit stamps are left alone.
  fn apply_update(&mut self, changes: Self);

  fn audit(&self) -> &Audit;
  fn audit_mut(&mut self) -> &mut Audit;
}

/// A record with an end-of-window transition (terminate, expire, close).
pub trait Windowed: Record {
  /// The status forced by the transition.
  const TERMINAL: Self::Status;

  fn set_window_end(&mut self, end: NaiveDate);
}
