//! Core types and the lifecycle engine for the business partner master-data
//! service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod contract;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod partner;
pub mod permission;
pub mod platform;
pub mod query;
pub mod record;
pub mod status;
pub mod store;
pub mod store_info;
pub mod window;

pub use error::{Error, Result};
