//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::path::Path;

use bpm_core::{query::Query, store::RecordStore};
use rusqlite::{params_from_iter, types::Value as SqlValue};
use tracing::debug;

use crate::{
  Error, Result,
  encode::RawRow,
  filter::{render, render_where},
  schema::SCHEMA,
  tables::Table,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A master-data store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` of every column and decode the rows.
  async fn select<R: Table>(
    &self,
    tail: String,
    params: Vec<SqlValue>,
  ) -> Result<Vec<R>> {
    let sql = format!("SELECT {} FROM {}{tail}", R::COLUMNS.join(", "), R::TABLE);
    let width = R::COLUMNS.len();
    debug!(table = R::TABLE, %sql, "select");

    let raws: Vec<Vec<SqlValue>> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(params), |row| {
            (0..width).map(|i| row.get::<_, SqlValue>(i)).collect()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|values| R::from_row(RawRow::new(R::TABLE, values)))
      .collect()
  }

  async fn insert<R: Table>(&self, mut record: R) -> Result<R> {
    let cols = &R::COLUMNS[1..];
    let placeholders = vec!["?"; cols.len()].join(", ");
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({placeholders})",
      R::TABLE,
      cols.join(", ")
    );
    let values = record.to_row();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(&sql, params_from_iter(values))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    record.set_id(Some(id));
    Ok(record)
  }

  async fn update<R: Table>(&self, id: i64, record: R) -> Result<R> {
    let assignments = R::COLUMNS[1..]
      .iter()
      .map(|c| format!("{c} = ?"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE {} SET {assignments} WHERE {} = ?",
      R::TABLE,
      R::COLUMNS[0]
    );
    let mut values = record.to_row();
    values.push(SqlValue::Integer(id));

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, params_from_iter(values))?))
      .await?;

    if changed == 0 {
      return Err(Error::RowNotFound { table: R::TABLE, id });
    }
    Ok(record)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl<R: Table> RecordStore<R> for SqliteStore {
  type Error = Error;

  async fn get(&self, id: i64) -> Result<Option<R>> {
    let tail = format!(" WHERE {} = ?", R::COLUMNS[0]);
    let mut rows = self.select::<R>(tail, vec![SqlValue::Integer(id)]).await?;
    Ok(rows.pop())
  }

  async fn save(&self, record: R) -> Result<R> {
    match record.id() {
      None => self.insert(record).await,
      Some(id) => self.update(id, record).await,
    }
  }

  async fn delete(&self, id: i64) -> Result<bool> {
    let sql = format!("DELETE FROM {} WHERE {} = ?1", R::TABLE, R::COLUMNS[0]);
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, [id])?))
      .await?;
    Ok(changed > 0)
  }

  async fn query(&self, query: &Query<R::Field>) -> Result<Vec<R>> {
    let filter = render::<R>(query);
    self.select::<R>(filter.sql, filter.params).await
  }

  async fn exists(&self, query: &Query<R::Field>) -> Result<bool> {
    let filter = render_where::<R>(query);
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {}{})", R::TABLE, filter.sql);
    let params = filter.params;

    let found: bool = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?)
      })
      .await?;
    Ok(found)
  }

  async fn count(&self, query: &Query<R::Field>) -> Result<u64> {
    let filter = render_where::<R>(query);
    let sql = format!("SELECT COUNT(*) FROM {}{}", R::TABLE, filter.sql);
    let params = filter.params;

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?)
      })
      .await?;
    Ok(u64::try_from(n).unwrap_or_default())
  }
}
