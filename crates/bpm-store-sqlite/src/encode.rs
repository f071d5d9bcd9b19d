//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text so that lexical order is date
//! order. Timestamps are RFC 3339 strings, decimals are their canonical
//! text, capability flags are `'Y'`/`'N'`, and statuses are their upper-case
//! names.

use std::str::FromStr;

use bpm_core::{query::Value, status::Status};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rusqlite::types::Value as SqlValue;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── Flags ───────────────────────────────────────────────────────────────────

pub fn encode_flag(b: bool) -> &'static str { if b { "Y" } else { "N" } }

pub fn decode_flag(s: &str) -> Result<bool> {
  match s {
    "Y" => Ok(true),
    "N" => Ok(false),
    other => Err(Error::Decode(format!("unknown flag: {other:?}"))),
  }
}

// ─── Query values ────────────────────────────────────────────────────────────

/// Bind a predicate value using the same encoding as the stored column.
pub fn encode_value(v: &Value) -> SqlValue {
  match v {
    Value::Null => SqlValue::Null,
    Value::Int(i) => SqlValue::Integer(*i),
    Value::Text(s) => SqlValue::Text(s.clone()),
    Value::Date(d) => SqlValue::Text(encode_date(*d)),
    Value::Bool(b) => SqlValue::Text(encode_flag(*b).to_owned()),
  }
}

// ─── Column builders ─────────────────────────────────────────────────────────

pub fn int(v: i64) -> SqlValue { SqlValue::Integer(v) }

pub fn opt_int(v: Option<i64>) -> SqlValue { v.map_or(SqlValue::Null, SqlValue::Integer) }

pub fn text(s: &str) -> SqlValue { SqlValue::Text(s.to_owned()) }

pub fn opt_text(s: Option<&str>) -> SqlValue { s.map_or(SqlValue::Null, text) }

pub fn date(d: NaiveDate) -> SqlValue { SqlValue::Text(encode_date(d)) }

pub fn opt_date(d: Option<NaiveDate>) -> SqlValue { d.map_or(SqlValue::Null, date) }

pub fn opt_dt(dt: Option<DateTime<Utc>>) -> SqlValue {
  dt.map_or(SqlValue::Null, |dt| SqlValue::Text(encode_dt(dt)))
}

pub fn flag(b: bool) -> SqlValue { text(encode_flag(b)) }

pub fn opt_decimal(d: Option<Decimal>) -> SqlValue {
  d.map_or(SqlValue::Null, |d| SqlValue::Text(d.to_string()))
}

pub fn status<S: Status>(s: S) -> SqlValue { text(s.as_str()) }

// ─── Row type ────────────────────────────────────────────────────────────────

/// Owned column values of one row, consumed left to right while decoding.
pub struct RawRow {
  table:  &'static str,
  values: std::vec::IntoIter<SqlValue>,
}

impl RawRow {
  pub fn new(table: &'static str, values: Vec<SqlValue>) -> Self {
    Self { table, values: values.into_iter() }
  }

  fn next(&mut self) -> Result<SqlValue> {
    self
      .values
      .next()
      .ok_or_else(|| Error::Decode(format!("{}: row has too few columns", self.table)))
  }

  fn mismatch(&self, want: &str, got: &SqlValue) -> Error {
    Error::Decode(format!("{}: expected {want}, found {got:?}", self.table))
  }

  pub fn opt_int(&mut self) -> Result<Option<i64>> {
    match self.next()? {
      SqlValue::Null => Ok(None),
      SqlValue::Integer(i) => Ok(Some(i)),
      other => Err(self.mismatch("integer", &other)),
    }
  }

  pub fn int(&mut self) -> Result<i64> {
    self.opt_int()?.ok_or_else(|| self.mismatch("integer", &SqlValue::Null))
  }

  pub fn opt_text(&mut self) -> Result<Option<String>> {
    match self.next()? {
      SqlValue::Null => Ok(None),
      SqlValue::Text(s) => Ok(Some(s)),
      other => Err(self.mismatch("text", &other)),
    }
  }

  pub fn text(&mut self) -> Result<String> {
    self.opt_text()?.ok_or_else(|| self.mismatch("text", &SqlValue::Null))
  }

  pub fn opt_date(&mut self) -> Result<Option<NaiveDate>> {
    self.opt_text()?.as_deref().map(decode_date).transpose()
  }

  pub fn date(&mut self) -> Result<NaiveDate> { decode_date(&self.text()?) }

  pub fn opt_dt(&mut self) -> Result<Option<DateTime<Utc>>> {
    self.opt_text()?.as_deref().map(decode_dt).transpose()
  }

  pub fn flag(&mut self) -> Result<bool> { decode_flag(&self.text()?) }

  pub fn opt_decimal(&mut self) -> Result<Option<Decimal>> {
    self
      .opt_text()?
      .map(|s| {
        Decimal::from_str(&s)
          .map_err(|e| Error::Decode(format!("bad decimal {s:?}: {e}")))
      })
      .transpose()
  }

  pub fn status<S: Status>(&mut self) -> Result<S> {
    let raw = self.text()?;
    raw
      .parse()
      .map_err(|_| Error::Decode(format!("{}: unknown status {raw:?}", self.table)))
  }
}

#[cfg(test)]
mod tests {
  use bpm_core::status::StoreStatus;

  use super::*;

  #[test]
  fn dates_sort_lexically() {
    let a = encode_date(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
    let b = encode_date(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
    assert_eq!(a, "2024-02-09");
    assert!(a < b);
  }

  #[test]
  fn raw_row_decodes_in_order() {
    let mut row = RawRow::new("t", vec![
      SqlValue::Integer(3),
      SqlValue::Null,
      SqlValue::Text("2024-06-30".into()),
      SqlValue::Text("Y".into()),
      SqlValue::Text("0.025".into()),
      SqlValue::Text("CLOSED".into()),
    ]);
    assert_eq!(row.int().unwrap(), 3);
    assert_eq!(row.opt_text().unwrap(), None);
    assert_eq!(row.date().unwrap(), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    assert!(row.flag().unwrap());
    assert_eq!(row.opt_decimal().unwrap(), Some(Decimal::new(25, 3)));
    assert_eq!(row.status::<StoreStatus>().unwrap(), StoreStatus::Closed);
    assert!(row.int().is_err());
  }

  #[test]
  fn bool_values_bind_as_flags() {
    assert_eq!(encode_value(&Value::Bool(false)), SqlValue::Text("N".into()));
  }
}
