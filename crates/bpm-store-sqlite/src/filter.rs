//! Rendering of [`Query`] predicates into SQL `WHERE` clauses.

use bpm_core::query::{Op, Predicate, Query, Value};
use rusqlite::types::Value as SqlValue;

use crate::{encode::encode_value, tables::Table};

/// A rendered query tail: `WHERE ...`, `ORDER BY ...` and `LIMIT ...`, with
/// its positional parameters.
#[derive(Debug, Default)]
pub struct Filter {
  pub sql:    String,
  pub params: Vec<SqlValue>,
}

fn op_sql(op: Op) -> &'static str {
  match op {
    Op::Eq => "=",
    Op::Ne => "<>",
    Op::Lt => "<",
    Op::Le => "<=",
    Op::Gt => ">",
    Op::Ge => ">=",
  }
}

fn render_predicate<R: Table>(
  predicate: &Predicate<R::Field>,
  params: &mut Vec<SqlValue>,
) -> String {
  match predicate {
    Predicate::Compare(field, op, Value::Null) => {
      let col = R::column(*field);
      match op {
        Op::Eq => format!("{col} IS NULL"),
        Op::Ne => format!("{col} IS NOT NULL"),
        // Ordering against NULL is never true.
        _ => "0".to_owned(),
      }
    }
    Predicate::Compare(field, op, value) => {
      params.push(encode_value(value));
      format!("{} {} ?", R::column(*field), op_sql(*op))
    }
    Predicate::IsNull(field) => format!("{} IS NULL", R::column(*field)),
    Predicate::Contains(field, needle) => {
      params.push(SqlValue::Text(needle.clone()));
      format!("instr(lower({}), lower(?)) > 0", R::column(*field))
    }
    Predicate::Any(group) if group.is_empty() => "0".to_owned(),
    Predicate::Any(group) => {
      let parts: Vec<String> =
        group.iter().map(|p| render_predicate::<R>(p, params)).collect();
      format!("({})", parts.join(" OR "))
    }
  }
}

/// Render the predicates only; ordering and limit are left out.
pub fn render_where<R: Table>(query: &Query<R::Field>) -> Filter {
  let mut params = Vec::new();
  let conds: Vec<String> = query
    .predicates
    .iter()
    .map(|p| render_predicate::<R>(p, &mut params))
    .collect();

  let sql = if conds.is_empty() {
    String::new()
  } else {
    format!(" WHERE {}", conds.join(" AND "))
  };
  Filter { sql, params }
}

/// Render predicates, ordering (ties broken by primary key) and limit.
pub fn render<R: Table>(query: &Query<R::Field>) -> Filter {
  let mut filter = render_where::<R>(query);
  let id = R::column(R::ID_FIELD);
  match query.order_by {
    Some(field) if field != R::ID_FIELD => {
      filter.sql.push_str(&format!(" ORDER BY {}, {id}", R::column(field)));
    }
    _ => filter.sql.push_str(&format!(" ORDER BY {id}")),
  }
  if let Some(n) = query.limit {
    filter.sql.push_str(&format!(" LIMIT {n}"));
  }
  filter
}
