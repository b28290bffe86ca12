//! Record — one submitted document plus a link to its stored attachment.
//!
//! Records are created by an upload and mutated only by minting a persistent
//! identifier. The JSON field names match the on-disk format of the store, so
//! `abstract_text` is written as `abstract`, `attachment_url` as `pdf_file`
//! and `persistent_id` as `doi`.

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Category assigned when the submitter leaves the field out.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Every record is created at this version and no operation changes it.
pub const RECORD_VERSION: u32 = 1;

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  pub id:             u64,
  pub title:          String,
  #[serde(rename = "abstract")]
  pub abstract_text:  String,
  pub category:       String,
  pub version:        u32,
  #[serde(with = "timestamp")]
  pub uploaded_at:    DateTime<Utc>,
  #[serde(rename = "pdf_file")]
  pub attachment_url: String,
  #[serde(rename = "doi", default)]
  pub persistent_id:  Option<String>,
}

impl Record {
  /// Build the record that `input` describes under the given id.
  ///
  /// `uploaded_at` is cut to the microsecond precision the store writes, so
  /// the returned record equals the one read back later.
  pub fn from_new(id: u64, input: NewRecord) -> Self {
    Record {
      id,
      title: input.title,
      abstract_text: input.abstract_text,
      category: input.category,
      version: RECORD_VERSION,
      uploaded_at: input.uploaded_at.trunc_subsecs(6),
      attachment_url: input.attachment_url,
      persistent_id: None,
    }
  }
}

/// Input to [`RecordStore::create_record`](crate::store::RecordStore::create_record).
///
/// The id is assigned by the store; everything else is fixed by the upload.
#[derive(Debug, Clone)]
pub struct NewRecord {
  pub title:           String,
  pub abstract_text:   String,
  pub category:        String,
  pub uploaded_at:     DateTime<Utc>,
  pub attachment_url:  String,
  /// Mint a persistent identifier as part of the same write.
  pub mint_identifier: bool,
}

/// The next id for a store holding `records`: one past the largest id, or 1.
pub fn next_id(records: &[Record]) -> u64 {
  records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
}

// ─── Encoding ────────────────────────────────────────────────────────────────

/// Serialise the full record list as pretty-printed JSON.
pub fn encode_list(records: &[Record]) -> Result<Vec<u8>> {
  Ok(serde_json::to_vec_pretty(records)?)
}

/// Parse a full record list.
pub fn decode_list(bytes: &[u8]) -> Result<Vec<Record>> {
  Ok(serde_json::from_slice(bytes)?)
}

/// `uploaded_at` is written as RFC 3339 (microseconds, `Z`). Older files hold
/// naive ISO-8601 timestamps without an offset; those are read as UTC.
mod timestamp {
  use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Micros, true))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
      return Ok(dt.with_timezone(&Utc));
    }
    raw
      .parse::<NaiveDateTime>()
      .map(|naive| naive.and_utc())
      .map_err(|e| D::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
  }
}
