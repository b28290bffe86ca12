//! Flat directory of uploaded attachments.
//!
//! Files are stored as `{YYYYMMDDHHMMSS}_{original name}` with spaces turned
//! into underscores. Two uploads of the same name within one second share a
//! stored name and the later one wins.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct UploadDir {
  root: PathBuf,
}

impl UploadDir {
  /// Use `root` as the upload directory, creating it if needed.
  pub async fn create(root: impl Into<PathBuf>) -> std::io::Result<Self> {
    let root = root.into();
    fs::create_dir_all(&root).await?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Write `data` under the stored name derived from `original` and `now`,
  /// returning that name.
  pub async fn store(
    &self,
    original: &str,
    data: &[u8],
    now: DateTime<Utc>,
  ) -> std::io::Result<String> {
    let name = stored_name(original, now);
    fs::write(self.root.join(&name), data).await?;
    tracing::debug!(name = %name, bytes = data.len(), "stored attachment");
    Ok(name)
  }

  /// Delete a previously stored attachment.
  pub async fn remove(&self, name: &str) -> std::io::Result<()> {
    fs::remove_file(self.root.join(name)).await
  }
}

/// Stored file name for an upload called `original` received at `now`.
///
/// Only the final path component of `original` is kept.
pub fn stored_name(original: &str, now: DateTime<Utc>) -> String {
  let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
  format!("{}_{}", now.format("%Y%m%d%H%M%S"), base.replace(' ', "_"))
}
