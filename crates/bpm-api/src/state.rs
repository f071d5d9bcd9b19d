//! Shared router state: one lifecycle engine per record kind, all over the
//! same gateway.

use std::sync::Arc;

use bpm_core::{
  contract::Contract, engine::LifecycleEngine, mapping::PlatformMapping,
  partner::Partner, permission::DataPermission, platform::Platform,
  store::Gateway, store_info::StoreInfo,
};

pub struct AppState<S> {
  pub partners:    LifecycleEngine<Partner, S>,
  pub platforms:   LifecycleEngine<Platform, S>,
  pub contracts:   LifecycleEngine<Contract, S>,
  pub stores:      LifecycleEngine<StoreInfo, S>,
  pub mappings:    LifecycleEngine<PlatformMapping, S>,
  pub permissions: LifecycleEngine<DataPermission, S>,
}

impl<S: Gateway> AppState<S> {
  pub fn new(gateway: Arc<S>) -> Self {
    Self {
      partners:    LifecycleEngine::new(Arc::clone(&gateway)),
      platforms:   LifecycleEngine::new(Arc::clone(&gateway)),
      contracts:   LifecycleEngine::new(Arc::clone(&gateway)),
      stores:      LifecycleEngine::new(Arc::clone(&gateway)),
      mappings:    LifecycleEngine::new(Arc::clone(&gateway)),
      permissions: LifecycleEngine::new(gateway),
    }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      partners:    self.partners.clone(),
      platforms:   self.platforms.clone(),
      contracts:   self.contracts.clone(),
      stores:      self.stores.clone(),
      mappings:    self.mappings.clone(),
      permissions: self.permissions.clone(),
    }
  }
}

/// Access to the engine for kind `R`, so handlers can be written once for
/// every kind.
pub trait HasEngine<R, S> {
  fn engine(&self) -> &LifecycleEngine<R, S>;
}

impl<S> HasEngine<Partner, S> for AppState<S> {
  fn engine(&self) -> &LifecycleEngine<Partner, S> { &self.partners }
}

impl<S> HasEngine<Platform, S> for AppState<S> {
  fn engine(&self) -> &LifecycleEngine<Platform, S> { &self.platforms }
}

impl<S> HasEngine<Contract, S> for AppState<S> {
  fn engine(&self) -> &LifecycleEngine<Contract, S> { &self.contracts }
}

impl<S> HasEngine<StoreInfo, S> for AppState<S> {
  fn engine(&self) -> &LifecycleEngine<StoreInfo, S> { &self.stores }
}

impl<S> HasEngine<PlatformMapping, S> for AppState<S> {
  fn engine(&self) -> &LifecycleEngine<PlatformMapping, S> { &self.mappings }
}

impl<S> HasEngine<DataPermission, S> for AppState<S> {
  fn engine(&self) -> &LifecycleEngine<DataPermission, S> { &self.permissions }
}
