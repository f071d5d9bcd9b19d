//! Runtime configuration, deserialised from `config.toml` and `BPM_*`
//! environment variables.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// SQLite database file. A leading `~/` is expanded.
  pub database_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "0.0.0.0".to_string(),
      port:          8080,
      database_path: PathBuf::from("bpmaster.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_keys_fall_back_to_defaults() {
    let cfg: ServerConfig = ::config::Config::builder()
      .add_source(::config::File::from_str("port = 9090", ::config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.database_path, PathBuf::from("bpmaster.db"));
    assert_eq!(cfg.address(), "0.0.0.0:9090");
  }
}
