//! JSON REST API for the business-partner master.
//!
//! Exposes an axum [`Router`] backed by any [`bpm_core::store::Gateway`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", bpm_api::api_router(store.clone()))
//! ```

pub mod contracts;
pub mod crud;
pub mod error;
pub mod mappings;
pub mod partners;
pub mod permissions;
pub mod platforms;
pub mod state;
pub mod stores;

use std::sync::Arc;

use axum::Router;
use bpm_core::store::Gateway;

pub use error::ApiError;
pub use state::AppState;

/// Build a fully-materialised API router for `gateway`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: Gateway>(gateway: Arc<S>) -> Router<()> {
  Router::new()
    .nest("/bp-master", partners::routes())
    .nest("/pf-code-master", platforms::routes())
    .nest("/bp-contract-info", contracts::routes())
    .nest("/bp-store-info", stores::routes())
    .nest("/bp-pf-mapping", mappings::routes())
    .nest("/bp-master-data-permission", permissions::routes())
    .with_state(AppState::new(gateway))
}

#[cfg(test)]
mod tests;
