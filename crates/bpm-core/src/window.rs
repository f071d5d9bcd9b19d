//! Effective-date windows.
//!
//! A window starts on a fixed date and either ends on a date or stays open.
//! Open ends are `None` everywhere, including in the predicates handed to the
//! storage layer, so no sentinel "end of time" date ever exists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  query::{Op, Predicate},
};

/// Today's date in the server's local time zone. Used wherever a date
/// parameter is omitted.
pub fn today() -> NaiveDate { chrono::Local::now().date_naive() }

/// Whether the end date of a window still counts as inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndBound {
  /// Effective on its last day (contracts, mappings, permissions).
  Inclusive,
  /// Not effective on its end date (a store closing on D is not operating
  /// on D).
  Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
  pub start: NaiveDate,
  pub end:   Option<NaiveDate>,
}

impl DateWindow {
  pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
    Self { start, end }
  }

  pub fn open(start: NaiveDate) -> Self { Self { start, end: None } }

  /// Reject windows whose end precedes their start.
  pub fn validate(&self) -> Result<()> {
    match self.end {
      Some(end) if end < self.start => {
        Err(Error::InvalidWindow { start: self.start, end })
      }
      _ => Ok(()),
    }
  }

  pub fn contains(&self, date: NaiveDate, bound: EndBound) -> bool {
    if date < self.start {
      return false;
    }
    match (self.end, bound) {
      (None, _) => true,
      (Some(end), EndBound::Inclusive) => date <= end,
      (Some(end), EndBound::Exclusive) => date < end,
    }
  }

  /// Closed-interval intersection; an open end extends to infinity.
  pub fn overlaps(&self, other: &DateWindow) -> bool {
    let starts_before_other_ends = other.end.is_none_or(|e| self.start <= e);
    let ends_after_other_starts = self.end.is_none_or(|e| e >= other.start);
    starts_before_other_ends && ends_after_other_starts
  }
}

/// The pair of columns holding a kind's window, and how its end is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFields<F> {
  pub start: F,
  pub end:   F,
  pub bound: EndBound,
}

impl<F: Copy> WindowFields<F> {
  /// Predicates selecting rows whose window contains `date`. Rows with a
  /// missing start never match, since `NULL <= date` is not true.
  pub fn containing(&self, date: NaiveDate) -> Vec<Predicate<F>> {
    let end_op = match self.bound {
      EndBound::Inclusive => Op::Ge,
      EndBound::Exclusive => Op::Gt,
    };
    vec![
      Predicate::Compare(self.start, Op::Le, date.into()),
      Predicate::Any(vec![
        Predicate::IsNull(self.end),
        Predicate::Compare(self.end, end_op, date.into()),
      ]),
    ]
  }

  /// Predicates selecting rows whose window intersects `window`, with the
  /// same closed-interval rule as [`DateWindow::overlaps`].
  pub fn overlapping(&self, window: &DateWindow) -> Vec<Predicate<F>> {
    let mut out = Vec::with_capacity(2);
    if let Some(end) = window.end {
      out.push(Predicate::Compare(self.start, Op::Le, end.into()));
    }
    out.push(Predicate::Any(vec![
      Predicate::IsNull(self.end),
      Predicate::Compare(self.end, Op::Ge, window.start.into()),
    ]));
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn w(start: &str, end: Option<&str>) -> DateWindow {
    DateWindow::new(d(start), end.map(d))
  }

  #[test]
  fn end_before_start_is_rejected() {
    let err = w("2024-06-30", Some("2024-01-01")).validate().unwrap_err();
    assert!(matches!(err, Error::InvalidWindow { .. }));
    assert!(w("2024-01-01", Some("2024-01-01")).validate().is_ok());
    assert!(w("2024-01-01", None).validate().is_ok());
  }

  #[test]
  fn overlap_is_closed_interval() {
    let first = w("2024-01-01", Some("2024-06-30"));
    assert!(first.overlaps(&w("2024-06-01", Some("2024-12-31"))));
    assert!(!first.overlaps(&w("2024-07-01", Some("2024-12-31"))));
    // Touching on a single day counts.
    assert!(first.overlaps(&w("2024-06-30", None)));
    // Open ends extend forever in both directions of the comparison.
    assert!(w("2020-01-01", None).overlaps(&first));
    assert!(first.overlaps(&w("2023-01-01", None)));
  }

  #[test]
  fn open_window_contains_every_later_date() {
    let open = w("2024-01-01", None);
    assert!(open.contains(d("2024-01-01"), EndBound::Inclusive));
    assert!(open.contains(d("2099-12-31"), EndBound::Exclusive));
    assert!(!open.contains(d("2023-12-31"), EndBound::Inclusive));
  }

  #[test]
  fn end_bound_decides_the_last_day() {
    let closed = w("2024-01-01", Some("2024-06-30"));
    assert!(closed.contains(d("2024-06-30"), EndBound::Inclusive));
    assert!(!closed.contains(d("2024-06-30"), EndBound::Exclusive));
    assert!(!closed.contains(d("2024-07-01"), EndBound::Inclusive));
  }

  #[test]
  fn overlapping_predicates_skip_bound_for_open_windows() {
    let fields = WindowFields { start: "start", end: "end", bound: EndBound::Inclusive };
    assert_eq!(fields.overlapping(&w("2024-01-01", None)).len(), 1);
    assert_eq!(fields.overlapping(&w("2024-01-01", Some("2024-02-01"))).len(), 2);
  }
}
