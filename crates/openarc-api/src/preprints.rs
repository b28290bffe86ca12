//! Handlers for `/api/preprints` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/preprints/` | Every record, in creation order |
//! | `POST` | `/api/preprints/` | Multipart upload; returns 201 + stored record |
//! | `GET`  | `/api/preprints/:id/` | 404 if not found |
//! | `POST` | `/api/preprints/:id/mint/` | 201 when minted now, 200 when already minted |

use axum::{
  Json,
  extract::{Multipart, Path, State, multipart::MultipartRejection},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use chrono::Utc;
use openarc_core::{
  record::{DEFAULT_CATEGORY, NewRecord, Record},
  store::{Minted, RecordStore},
};
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Only plain decimal digits name a record; signs and whitespace do not.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
  if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
    return Err(ApiError::NotFound);
  }
  raw.parse().map_err(|_| ApiError::NotFound)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/preprints/`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: RecordStore,
{
  let records = state.store.list_records().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/preprints/:id/`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Record>, ApiError>
where
  S: RecordStore,
{
  let id = parse_id(&id)?;
  let record = state
    .store
    .get_record(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(record))
}

// ─── Upload ───────────────────────────────────────────────────────────────────

/// A file part of the upload form.
#[derive(Debug)]
struct Attachment {
  file_name: String,
  data:      Bytes,
}

/// Raw upload form as received. Text parts keep their first value; parts with
/// a file name count only as attachments.
#[derive(Debug, Default)]
struct UploadForm {
  title:         Option<String>,
  abstract_text: Option<String>,
  category:      Option<String>,
  mint_doi:      Option<String>,
  pdf_file:      Option<Attachment>,
}

/// A validated upload.
#[derive(Debug)]
struct Submission {
  title:         String,
  abstract_text: String,
  category:      String,
  mint:          bool,
  attachment:    Attachment,
}

impl UploadForm {
  async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
      let name = field.name().unwrap_or_default().to_owned();

      if let Some(file_name) = field.file_name().map(str::to_owned) {
        let data = field.bytes().await?;
        if name == "pdf_file" && !file_name.is_empty() && form.pdf_file.is_none() {
          form.pdf_file = Some(Attachment { file_name, data });
        }
        continue;
      }

      let slot = match name.as_str() {
        "title" => &mut form.title,
        "abstract" => &mut form.abstract_text,
        "category" => &mut form.category,
        "mint_doi" => &mut form.mint_doi,
        _ => continue,
      };
      let value = field.text().await?;
      slot.get_or_insert(value);
    }

    Ok(form)
  }

  fn validate(self) -> Result<Submission, ApiError> {
    let title = self.title.as_deref().map(str::trim).unwrap_or_default();
    let abstract_text =
      self.abstract_text.as_deref().map(str::trim).unwrap_or_default();

    let attachment = match self.pdf_file {
      Some(a) if !title.is_empty() && !abstract_text.is_empty() => a,
      _ => return Err(ApiError::MissingFields),
    };

    Ok(Submission {
      title: title.to_owned(),
      abstract_text: abstract_text.to_owned(),
      category: self
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
      mint: self.mint_doi.as_deref() == Some("true"),
      attachment,
    })
  }
}

/// `POST /api/preprints/` — multipart fields `title`, `abstract`,
/// `category` (optional), `mint_doi` (optional, `"true"` to mint) and the
/// `pdf_file` attachment. Returns 201 + the stored [`Record`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let multipart = multipart.map_err(|_| ApiError::MissingFields)?;
  let submission = UploadForm::read(multipart).await?.validate()?;

  let now = Utc::now();
  let stored = state
    .uploads
    .store(&submission.attachment.file_name, &submission.attachment.data, now)
    .await?;

  let host = headers
    .get(header::HOST)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned)
    .unwrap_or_else(|| state.config.address());

  let created = state
    .store
    .create_record(NewRecord {
      title:           submission.title,
      abstract_text:   submission.abstract_text,
      category:        submission.category,
      uploaded_at:     now,
      attachment_url:  format!("http://{host}/api/files/{stored}"),
      mint_identifier: submission.mint,
    })
    .await;

  // No record points at the attachment if the store write failed.
  let record = match created {
    Ok(record) => record,
    Err(e) => {
      if let Err(cleanup) = state.uploads.remove(&stored).await {
        tracing::warn!(
          attachment = %stored,
          error = %cleanup,
          "failed to remove orphaned attachment"
        );
      }
      return Err(ApiError::store(e));
    }
  };

  tracing::info!(
    id = record.id,
    attachment = %stored,
    doi = record.persistent_id.as_deref(),
    "created record"
  );
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Mint ─────────────────────────────────────────────────────────────────────

/// `POST /api/preprints/:id/mint/` — body `{"doi": "..."}`.
pub async fn mint<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = parse_id(&id)?;
  let minted = state
    .store
    .mint_identifier(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;

  let status = match &minted {
    Minted::Existing(_) => StatusCode::OK,
    Minted::Created(doi) => {
      tracing::info!(id, doi = %doi, "minted identifier");
      StatusCode::CREATED
    }
  };
  Ok((status, Json(json!({ "doi": minted.into_identifier() }))))
}
