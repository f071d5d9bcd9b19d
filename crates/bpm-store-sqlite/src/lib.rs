//! SQLite backend for the master-data service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. One generic [`RecordStore`] impl
//! serves every record kind through its [`Table`] layout.
//!
//! [`RecordStore`]: bpm_core::store::RecordStore

mod encode;
mod filter;
mod schema;
mod store;

pub mod error;
pub mod tables;

pub use error::{Error, Result};
pub use store::SqliteStore;
pub use tables::Table;

#[cfg(test)]
mod tests;
