//! Persistent identifier minting.
//!
//! Identifiers look like DOIs (`10.55555/openarc.202502-0001`) but are only
//! generated locally; nothing is registered with an external authority.

use chrono::{DateTime, Utc};

use crate::record::Record;

/// Fixed prefix of every minted identifier.
pub const IDENTIFIER_PREFIX: &str = "10.55555/openarc";

/// `YYYYMM` label for the month containing `now`.
pub fn month_label(now: DateTime<Utc>) -> String {
  now.format("%Y%m").to_string()
}

/// Generate the next identifier for the month containing `now`.
///
/// The sequence number is one more than the count of `existing` records whose
/// identifier already carries this month's label. There is no reservation, so
/// two callers working from the same snapshot receive the same identifier.
pub fn generate_identifier(existing: &[Record], now: DateTime<Utc>) -> String {
  let label = month_label(now);
  let month_prefix = format!("{IDENTIFIER_PREFIX}.{label}");

  let minted_this_month = existing
    .iter()
    .filter_map(|r| r.persistent_id.as_deref())
    .filter(|id| id.starts_with(&month_prefix))
    .count();

  format!("{month_prefix}-{:04}", minted_this_month + 1)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;
  use crate::record::{DEFAULT_CATEGORY, RECORD_VERSION};

  fn record(id: u64, persistent_id: Option<&str>) -> Record {
    Record {
      id,
      title: format!("record {id}"),
      abstract_text: "abstract".into(),
      category: DEFAULT_CATEGORY.into(),
      version: RECORD_VERSION,
      uploaded_at: Utc::now(),
      attachment_url: format!("http://localhost/api/files/{id}.pdf"),
      persistent_id: persistent_id.map(str::to_owned),
    }
  }

  fn feb_2025() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap()
  }

  #[test]
  fn first_identifier_of_the_month() {
    assert_eq!(
      generate_identifier(&[], feb_2025()),
      "10.55555/openarc.202502-0001"
    );
  }

  #[test]
  fn counts_only_identifiers_from_the_same_month() {
    let existing = vec![
      record(1, Some("10.55555/openarc.202501-0001")),
      record(2, Some("10.55555/openarc.202502-0001")),
      record(3, None),
      record(4, Some("10.55555/openarc.202502-0002")),
    ];
    assert_eq!(
      generate_identifier(&existing, feb_2025()),
      "10.55555/openarc.202502-0003"
    );
  }

  #[test]
  fn pads_month_and_sequence() {
    let jan = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
    assert_eq!(month_label(jan), "202601");
    assert_eq!(generate_identifier(&[], jan), "10.55555/openarc.202601-0001");
  }

  #[test]
  fn ignores_identifiers_with_a_foreign_prefix() {
    let existing = vec![record(1, Some("10.1234/other.202502-0001"))];
    assert_eq!(
      generate_identifier(&existing, feb_2025()),
      "10.55555/openarc.202502-0001"
    );
  }
}
