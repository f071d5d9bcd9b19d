//! Storage-agnostic filter predicates.
//!
//! A [`Query`] is a conjunction of [`Predicate`]s over a record kind's field
//! enum. Backends translate it into their own query language; the engine and
//! the request handlers only ever build queries, never SQL.

use std::fmt;

use chrono::NaiveDate;

// ─── Values ──────────────────────────────────────────────────────────────────

/// A scalar compared against a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Int(i64),
  Text(String),
  Date(NaiveDate),
  Bool(bool),
}

impl Value {
  pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => f.write_str("null"),
      Value::Int(v) => write!(f, "{v}"),
      Value::Text(v) => f.write_str(v),
      Value::Date(v) => write!(f, "{v}"),
      Value::Bool(v) => write!(f, "{v}"),
    }
  }
}

impl From<i64> for Value {
  fn from(v: i64) -> Self { Value::Int(v) }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<NaiveDate> for Value {
  fn from(v: NaiveDate) -> Self { Value::Date(v) }
}

impl From<String> for Value {
  fn from(v: String) -> Self { Value::Text(v) }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self { Value::Text(v.to_owned()) }
}

impl From<&String> for Value {
  fn from(v: &String) -> Self { Value::Text(v.clone()) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Value::Null, Into::into) }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<F> {
  Compare(F, Op, Value),
  IsNull(F),
  /// Case-insensitive substring match.
  Contains(F, String),
  /// Disjunction; an empty group matches nothing.
  Any(Vec<Predicate<F>>),
}

impl<F> Predicate<F> {
  /// Equality where a null value means "field is null" rather than "never".
  pub fn eq(field: F, value: impl Into<Value>) -> Self {
    match value.into() {
      Value::Null => Predicate::IsNull(field),
      v => Predicate::Compare(field, Op::Eq, v),
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Query<F> {
  pub predicates: Vec<Predicate<F>>,
  /// Ascending sort field; `None` leaves ordering to the engine default.
  pub order_by:   Option<F>,
  pub limit:      Option<usize>,
}

impl<F> Default for Query<F> {
  fn default() -> Self {
    Self { predicates: Vec::new(), order_by: None, limit: None }
  }
}

impl<F> Query<F> {
  pub fn new() -> Self { Self::default() }

  pub fn filter(mut self, predicate: Predicate<F>) -> Self {
    self.predicates.push(predicate);
    self
  }

  pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate<F>>) -> Self {
    self.predicates.extend(predicates);
    self
  }

  pub fn eq(self, field: F, value: impl Into<Value>) -> Self {
    self.filter(Predicate::eq(field, value))
  }

  /// Equality only when a value was supplied. List endpoints use this for
  /// their optional query-string filters.
  pub fn eq_opt<V: Into<Value>>(self, field: F, value: Option<V>) -> Self {
    match value {
      Some(v) => self.eq(field, v),
      None => self,
    }
  }

  pub fn cmp(self, field: F, op: Op, value: impl Into<Value>) -> Self {
    self.filter(Predicate::Compare(field, op, value.into()))
  }

  pub fn ne(self, field: F, value: impl Into<Value>) -> Self {
    self.cmp(field, Op::Ne, value)
  }

  /// Inclusive range on both sides.
  pub fn between(self, field: F, from: impl Into<Value>, to: impl Into<Value>) -> Self
  where
    F: Copy,
  {
    self.cmp(field, Op::Ge, from).cmp(field, Op::Le, to)
  }

  pub fn contains(self, field: F, needle: impl Into<String>) -> Self {
    self.filter(Predicate::Contains(field, needle.into()))
  }

  pub fn any(self, group: Vec<Predicate<F>>) -> Self {
    self.filter(Predicate::Any(group))
  }

  pub fn order_by(mut self, field: F) -> Self {
    self.order_by = Some(field);
    self
  }

  pub fn limit(mut self, n: usize) -> Self {
    self.limit = Some(n);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn eq_with_missing_value_means_is_null() {
    let q = Query::new().eq("target", Option::<i64>::None).eq("bp", 7_i64);
    assert_eq!(q.predicates, vec![
      Predicate::IsNull("target"),
      Predicate::Compare("bp", Op::Eq, Value::Int(7)),
    ]);
  }

  #[test]
  fn eq_opt_skips_absent_filters() {
    let q = Query::new()
      .eq_opt("status", Some("ACTIVE"))
      .eq_opt("type", Option::<String>::None);
    assert_eq!(q.predicates.len(), 1);
  }

  #[test]
  fn between_is_two_inclusive_bounds() {
    let from: NaiveDate = "2024-01-01".parse().unwrap();
    let to: NaiveDate = "2024-01-31".parse().unwrap();
    let q = Query::new().between("opened", from, to);
    assert_eq!(q.predicates, vec![
      Predicate::Compare("opened", Op::Ge, Value::Date(from)),
      Predicate::Compare("opened", Op::Le, Value::Date(to)),
    ]);
  }
}
