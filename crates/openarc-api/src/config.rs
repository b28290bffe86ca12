//! Runtime server configuration.
//!
//! Read from an optional TOML file, then overridden by `OPENARC_*`
//! environment variables. Every field has a default, so the server runs with
//! no configuration at all.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// JSON document holding every record.
  pub data_file:        PathBuf,
  /// Flat directory holding uploaded attachments.
  pub upload_dir:       PathBuf,
  /// Largest accepted request body, in bytes.
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".to_string(),
      port:             5001,
      data_file:        PathBuf::from("data.json"),
      upload_dir:       PathBuf::from("uploads"),
      max_upload_bytes: 64 * 1024 * 1024,
    }
  }
}

impl ServerConfig {
  /// Layer `path` (if it exists) and the `OPENARC_*` environment over the
  /// defaults.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("OPENARC"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, used both for binding and as the attachment URL host when
  /// a request carries no `Host` header.
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  /// Expand a leading `~` in the configured paths.
  pub fn expand_paths(mut self) -> Self {
    self.data_file = expand_tilde(&self.data_file);
    self.upload_dir = expand_tilde(&self.upload_dir);
    self
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
