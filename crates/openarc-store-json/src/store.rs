//! [`JsonStore`] — the JSON file implementation of [`RecordStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use chrono::Utc;
use tokio::{fs, sync::Mutex};

use openarc_core::{
  identifier::generate_identifier,
  record::{NewRecord, Record, decode_list, encode_list, next_id},
  store::{Minted, RecordStore},
};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a single JSON file.
///
/// Cloning is cheap; clones share the write lock, so load-mutate-save
/// sequences issued through any clone in this process never interleave.
/// Nothing guards against a second process writing the same file, and writes
/// are plain overwrites.
#[derive(Clone)]
pub struct JsonStore {
  path:       PathBuf,
  write_lock: Arc<Mutex<()>>,
}

impl JsonStore {
  /// Open (or create) a store at `path`.
  ///
  /// Creates the parent directory if needed and initialises a missing file
  /// to an empty list.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)
        .await
        .map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
    }

    let store = Self { path, write_lock: Arc::new(Mutex::new(())) };
    store.load_all().await?;
    Ok(store)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read every record from the backing file.
  ///
  /// - Missing file: it is created holding `[]` and the result is empty.
  /// - Unparseable file: the result is empty and the file is left untouched
  ///   until the next mutation overwrites it.
  pub async fn load_all(&self) -> Result<Vec<Record>> {
    let bytes = match fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        self.save_all(&[]).await?;
        return Ok(Vec::new());
      }
      Err(source) => {
        return Err(Error::Io { path: self.path.clone(), source });
      }
    };

    match decode_list(&bytes) {
      Ok(records) => Ok(records),
      Err(e) => {
        tracing::warn!(
          path = %self.path.display(),
          error = %e,
          "store file is not a valid record list; treating it as empty"
        );
        Ok(Vec::new())
      }
    }
  }

  /// Overwrite the backing file with `records`.
  pub async fn save_all(&self, records: &[Record]) -> Result<()> {
    let bytes = encode_list(records)?;
    fs::write(&self.path, bytes)
      .await
      .map_err(|source| Error::Io { path: self.path.clone(), source })
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for JsonStore {
  type Error = Error;

  async fn list_records(&self) -> Result<Vec<Record>> {
    self.load_all().await
  }

  async fn get_record(&self, id: u64) -> Result<Option<Record>> {
    let records = self.load_all().await?;
    Ok(records.into_iter().find(|r| r.id == id))
  }

  async fn create_record(&self, input: NewRecord) -> Result<Record> {
    let _guard = self.write_lock.lock().await;
    let mut records = self.load_all().await?;

    let mint = input.mint_identifier;
    let mut record = Record::from_new(next_id(&records), input);
    if mint {
      record.persistent_id = Some(generate_identifier(&records, Utc::now()));
    }

    records.push(record.clone());
    self.save_all(&records).await?;
    Ok(record)
  }

  async fn mint_identifier(&self, id: u64) -> Result<Option<Minted>> {
    let _guard = self.write_lock.lock().await;
    let mut records = self.load_all().await?;

    let Some(index) = records.iter().position(|r| r.id == id) else {
      return Ok(None);
    };
    if let Some(existing) = records[index]
      .persistent_id
      .as_ref()
      .filter(|id| !id.is_empty())
    {
      return Ok(Some(Minted::Existing(existing.clone())));
    }

    let identifier = generate_identifier(&records, Utc::now());
    records[index].persistent_id = Some(identifier.clone());
    self.save_all(&records).await?;
    Ok(Some(Minted::Created(identifier)))
  }
}
