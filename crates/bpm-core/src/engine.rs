//! The temporal lifecycle engine.
//!
//! One [`LifecycleEngine`] per record kind. It reads the kind's
//! [`Policy`](crate::record::Policy) table and performs every uniqueness,
//! overlap and effectiveness rule against a [`RecordStore`]; the kind itself
//! only supplies field values.

use std::{marker::PhantomData, sync::Arc};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  query::{Query, Value},
  record::{Record, ScopeRule, Windowed},
  status::Status,
  store::RecordStore,
  window::{DateWindow, WindowFields, today},
};

pub struct LifecycleEngine<R, S> {
  gateway: Arc<S>,
  record:  PhantomData<fn() -> R>,
}

impl<R, S> Clone for LifecycleEngine<R, S> {
  fn clone(&self) -> Self {
    Self { gateway: Arc::clone(&self.gateway), record: PhantomData }
  }
}

/// Equality on every pair, optionally excluding one id.
fn matching<R: Record>(
  pairs: impl IntoIterator<Item = (R::Field, Value)>,
  exclude: Option<i64>,
) -> Query<R::Field> {
  let mut query = pairs
    .into_iter()
    .fold(Query::new(), |q, (field, value)| q.eq(field, value));
  if let Some(id) = exclude {
    query = query.ne(R::ID_FIELD, id);
  }
  query
}

fn window_fields<R: Record>() -> Result<WindowFields<R::Field>> {
  R::POLICY.window.ok_or(Error::NoWindow { kind: R::KIND })
}

fn joined(values: &[Value]) -> String {
  values.iter().map(ToString::to_string).collect::<Vec<_>>().join("/")
}

impl<R: Record, S: RecordStore<R>> LifecycleEngine<R, S> {
  pub fn new(gateway: Arc<S>) -> Self {
    Self { gateway, record: PhantomData }
  }

  pub fn gateway(&self) -> &Arc<S> { &self.gateway }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get(&self, id: i64) -> Result<R> {
    debug!(kind = %R::KIND, id, "get");
    self
      .gateway
      .get(id)
      .await
      .map_err(Error::gateway)?
      .ok_or_else(|| Error::not_found(R::KIND, id))
  }

  /// The single record whose `field` equals `value` (business-key lookup).
  pub async fn find_one(
    &self,
    field: R::Field,
    value: impl Into<Value>,
  ) -> Result<R> {
    let value = value.into();
    let key = value.to_string();
    let query = Query::new().eq(field, value).limit(1);
    self
      .list(query)
      .await?
      .into_iter()
      .next()
      .ok_or_else(|| Error::not_found(R::KIND, key))
  }

  /// Run a filter query, falling back to the kind's default ordering.
  pub async fn list(&self, mut query: Query<R::Field>) -> Result<Vec<R>> {
    if query.order_by.is_none() {
      query.order_by = R::POLICY.order_by;
    }
    debug!(kind = %R::KIND, predicates = query.predicates.len(), "list");
    self.gateway.query(&query).await.map_err(Error::gateway)
  }

  pub async fn exists(&self, query: &Query<R::Field>) -> Result<bool> {
    self.gateway.exists(query).await.map_err(Error::gateway)
  }

  pub async fn count(&self, query: &Query<R::Field>) -> Result<u64> {
    self.gateway.count(query).await.map_err(Error::gateway)
  }

  /// Whether any record agrees with every pair. A null value only matches a
  /// null field.
  pub async fn exists_matching(
    &self,
    fields: &[(R::Field, Value)],
  ) -> Result<bool> {
    self.exists(&matching::<R>(fields.iter().cloned(), None)).await
  }

  /// Whether an ACTIVE record in `scope` has a window intersecting `window`.
  pub async fn exists_overlapping(
    &self,
    scope: &[(R::Field, Value)],
    window: DateWindow,
  ) -> Result<bool> {
    self.overlapping(scope.iter().cloned(), &window, None).await
  }

  /// The query selecting ACTIVE records in `scope` effective on `as_of`.
  pub fn effective(
    &self,
    scope: &[(R::Field, Value)],
    as_of: NaiveDate,
  ) -> Result<Query<R::Field>> {
    let fields = window_fields::<R>()?;
    Ok(
      matching::<R>(scope.iter().cloned(), None)
        .eq(R::POLICY.status, R::Status::ACTIVE.as_str())
        .filters(fields.containing(as_of)),
    )
  }

  pub async fn find_effective(
    &self,
    scope: &[(R::Field, Value)],
    as_of: NaiveDate,
  ) -> Result<Vec<R>> {
    self.list(self.effective(scope, as_of)?).await
  }

  // ── Writes ────────────────────────────────────────────────────────────

  pub async fn create(&self, mut record: R, actor: Option<&str>) -> Result<R> {
    self.validate(&record, None).await.inspect_err(|err| {
      warn!(kind = %R::KIND, error = %err, "create rejected");
    })?;

    record.set_id(None);
    record.audit_mut().stamp_created(actor, Utc::now());
    let saved = self.gateway.save(record).await.map_err(Error::gateway)?;
    info!(kind = %R::KIND, id = saved.id(), "created");
    Ok(saved)
  }

  /// Replace every mutable field of record `id` with those of `changes`.
  pub async fn update(
    &self,
    id: i64,
    changes: R,
    actor: Option<&str>,
  ) -> Result<R> {
    let mut record = self.get(id).await?;
    record.apply_update(changes);
    self.validate(&record, Some(id)).await.inspect_err(|err| {
      warn!(kind = %R::KIND, id, error = %err, "update rejected");
    })?;

    record.audit_mut().stamp_updated(actor, Utc::now());
    let saved = self.gateway.save(record).await.map_err(Error::gateway)?;
    info!(kind = %R::KIND, id, "updated");
    Ok(saved)
  }

  /// Set the status alone. Any value of the kind's set is accepted from any
  /// other.
  pub async fn set_status(
    &self,
    id: i64,
    status: R::Status,
    actor: Option<&str>,
  ) -> Result<R> {
    let mut record = self.get(id).await?;
    record.set_status(status);
    record.audit_mut().stamp_updated(actor, Utc::now());
    let saved = self.gateway.save(record).await.map_err(Error::gateway)?;
    info!(kind = %R::KIND, id, %status, "status changed");
    Ok(saved)
  }

  pub async fn delete(&self, id: i64) -> Result<()> {
    if !self.gateway.delete(id).await.map_err(Error::gateway)? {
      return Err(Error::not_found(R::KIND, id));
    }
    info!(kind = %R::KIND, id, "deleted");
    Ok(())
  }

  // ── Rules ─────────────────────────────────────────────────────────────

  /// Window ordering, then every unique key, then the scope rule. `exclude`
  /// is the record's own id when it already exists; the overlap rule then
  /// applies only if the record is ACTIVE.
  async fn validate(&self, record: &R, exclude: Option<i64>) -> Result<()> {
    if let Some(window) = record.window() {
      window.validate()?;
    }

    for key in R::POLICY.unique_keys {
      let values: Vec<Value> =
        key.fields.iter().map(|f| record.value(*f)).collect();
      if values.iter().any(Value::is_null) {
        continue;
      }
      let query = matching::<R>(
        key.fields.iter().copied().zip(values.iter().cloned()),
        exclude,
      );
      if self.exists(&query).await? {
        return Err(Error::Conflict(format!(
          "{} already exists: {}",
          key.label,
          joined(&values)
        )));
      }
    }

    match R::POLICY.scope_rule {
      ScopeRule::None => Ok(()),
      ScopeRule::OverlapExclusion { scope } => {
        // Only ACTIVE records exclude each other. A new record is always
        // checked; an existing one only while it is ACTIVE.
        if exclude.is_some() && record.status() != R::Status::ACTIVE {
          return Ok(());
        }
        let Some(window) = record.window() else {
          return Ok(());
        };
        let pairs = scope.iter().map(|f| (*f, record.value(*f)));
        if self.overlapping(pairs, &window, exclude).await? {
          return Err(Error::Conflict(format!(
            "an active {} in the same scope overlaps {} to {}",
            R::KIND,
            window.start,
            window.end.map_or_else(|| "open end".to_owned(), |d| d.to_string()),
          )));
        }
        Ok(())
      }
      ScopeRule::ExactDuplicate { fields } => {
        let values: Vec<Value> =
          fields.iter().map(|f| record.value(*f)).collect();
        let query =
          matching::<R>(fields.iter().copied().zip(values.iter().cloned()), exclude);
        if self.exists(&query).await? {
          return Err(Error::Conflict(format!(
            "duplicate {}: {}",
            R::KIND,
            joined(&values)
          )));
        }
        Ok(())
      }
    }
  }

  async fn overlapping(
    &self,
    scope: impl IntoIterator<Item = (R::Field, Value)>,
    window: &DateWindow,
    exclude: Option<i64>,
  ) -> Result<bool> {
    let fields = window_fields::<R>()?;
    let query = matching::<R>(scope, exclude)
      .eq(R::POLICY.status, R::Status::ACTIVE.as_str())
      .filters(fields.overlapping(window));
    self.exists(&query).await
  }
}

impl<R: Windowed, S: RecordStore<R>> LifecycleEngine<R, S> {
  /// End the record's window on `end` (today if omitted) and force the
  /// kind's terminal status. Repeating the call with the same date changes
  /// nothing further.
  pub async fn close_window(
    &self,
    id: i64,
    end: Option<NaiveDate>,
    actor: Option<&str>,
  ) -> Result<R> {
    let end = end.unwrap_or_else(today);
    let mut record = self.get(id).await?;
    record.set_window_end(end);
    if let Some(window) = record.window() {
      window.validate().inspect_err(|err| {
        warn!(kind = %R::KIND, id, error = %err, "close rejected");
      })?;
    }
    record.set_status(R::TERMINAL);
    record.audit_mut().stamp_updated(actor, Utc::now());
    let saved = self.gateway.save(record).await.map_err(Error::gateway)?;
    info!(kind = %R::KIND, id, %end, status = %R::TERMINAL, "window closed");
    Ok(saved)
  }
}
