//! Entity kinds and their closed status enumerations.
//!
//! Statuses travel as upper-case names (`"ACTIVE"`, `"TERMINATED"`, ...) on
//! the wire and in storage. Parsing anything outside a kind's set fails with
//! [`Error::InvalidStatus`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// The record kinds managed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntityKind {
  #[strum(serialize = "business partner")]
  Partner,
  #[strum(serialize = "platform code")]
  Platform,
  #[strum(serialize = "contract")]
  Contract,
  #[strum(serialize = "store")]
  Store,
  #[strum(serialize = "platform mapping")]
  PlatformMapping,
  #[strum(serialize = "data permission")]
  DataPermission,
}

/// Behaviour shared by every per-kind status enumeration.
pub trait Status:
  Copy
  + Eq
  + fmt::Debug
  + fmt::Display
  + FromStr
  + Into<&'static str>
  + Serialize
  + DeserializeOwned
  + Send
  + Sync
  + 'static
{
  /// The value that makes a record take part in active/effective queries.
  const ACTIVE: Self;

  fn as_str(self) -> &'static str { self.into() }
}

/// Parse a status name for `kind`, case-insensitively.
pub fn parse_status<S: Status>(kind: EntityKind, raw: &str) -> Result<S> {
  raw
    .trim()
    .to_ascii_uppercase()
    .parse()
    .map_err(|_| Error::InvalidStatus { kind, value: raw.to_owned() })
}

// ─── Per-kind statuses ───────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerStatus {
  #[default]
  Active,
  Inactive,
  Suspended,
}

impl Status for PartnerStatus {
  const ACTIVE: Self = Self::Active;
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformStatus {
  #[default]
  Active,
  Inactive,
}

impl Status for PlatformStatus {
  const ACTIVE: Self = Self::Active;
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
  #[default]
  Active,
  Expired,
  Terminated,
}

impl Status for ContractStatus {
  const ACTIVE: Self = Self::Active;
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreStatus {
  #[default]
  Active,
  Inactive,
  Closed,
}

impl Status for StoreStatus {
  const ACTIVE: Self = Self::Active;
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingStatus {
  #[default]
  Active,
  Inactive,
  Expired,
}

impl Status for MappingStatus {
  const ACTIVE: Self = Self::Active;
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionStatus {
  #[default]
  Active,
  Inactive,
  Expired,
}

impl Status for PermissionStatus {
  const ACTIVE: Self = Self::Active;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_case_insensitively() {
    let s: ContractStatus =
      parse_status(EntityKind::Contract, "terminated").unwrap();
    assert_eq!(s, ContractStatus::Terminated);
    assert_eq!(s.as_str(), "TERMINATED");
  }

  #[test]
  fn rejects_values_outside_the_kind() {
    // CLOSED is a store status, not a contract status.
    let err = parse_status::<ContractStatus>(EntityKind::Contract, "CLOSED")
      .unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidStatus { kind: EntityKind::Contract, ref value } if value == "CLOSED"
    ));
  }

  #[test]
  fn serde_uses_upper_case_names() {
    let json = serde_json::to_string(&StoreStatus::Closed).unwrap();
    assert_eq!(json, "\"CLOSED\"");
    let back: MappingStatus = serde_json::from_str("\"EXPIRED\"").unwrap();
    assert_eq!(back, MappingStatus::Expired);
    assert!(serde_json::from_str::<PartnerStatus>("\"GONE\"").is_err());
  }

  #[test]
  fn kind_display_is_human_readable() {
    assert_eq!(EntityKind::DataPermission.to_string(), "data permission");
  }
}
