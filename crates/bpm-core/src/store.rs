//! The storage gateway traits.
//!
//! Backends (e.g. `bpm-store-sqlite`) implement [`RecordStore`] once per
//! record kind. Higher layers (`bpm-api`, the engine) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  contract::Contract, mapping::PlatformMapping, partner::Partner,
  permission::DataPermission, platform::Platform, query::Query,
  record::Record, store_info::StoreInfo,
};

/// Failure type of a gateway.
pub trait GatewayError: std::error::Error + Send + Sync + 'static {
  /// Whether the backend rejected the write because of a uniqueness or
  /// overlap constraint.
  fn is_conflict(&self) -> bool;
}

/// Async persistence for one record kind.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore<R: Record>: Send + Sync + 'static {
  type Error: GatewayError;

  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send + '_;

  /// Insert when the record has no id, otherwise overwrite the stored row.
  /// Returns the record as persisted, with its id assigned.
  fn save(
    &self,
    record: R,
  ) -> impl Future<Output = Result<R, Self::Error>> + Send + '_;

  /// Returns `false` if no row had this id.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn query<'a>(
    &'a self,
    query: &'a Query<R::Field>,
  ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send + 'a;

  fn exists<'a>(
    &'a self,
    query: &'a Query<R::Field>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn count<'a>(
    &'a self,
    query: &'a Query<R::Field>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}

/// A backend that stores every record kind.
pub trait Gateway:
  RecordStore<Partner>
  + RecordStore<Platform>
  + RecordStore<Contract>
  + RecordStore<StoreInfo>
  + RecordStore<PlatformMapping>
  + RecordStore<DataPermission>
{
}

impl<S> Gateway for S where
  S: RecordStore<Partner>
    + RecordStore<Platform>
    + RecordStore<Contract>
    + RecordStore<StoreInfo>
    + RecordStore<PlatformMapping>
    + RecordStore<DataPermission>
{
}
