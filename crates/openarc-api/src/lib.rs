//! HTTP API for OpenArc.
//!
//! Exposes an axum [`Router`] backed by any
//! [`openarc_core::store::RecordStore`], plus the flat upload directory that
//! holds attachments.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/preprints/` | See [`preprints`] |
//! | `POST` | `/api/preprints/` | |
//! | `GET`  | `/api/preprints/:id/` | |
//! | `POST` | `/api/preprints/:id/mint/` | |
//! | `GET`  | `/api/files/:filename` | Stored attachment bytes; plain 404 if absent |

pub mod config;
pub mod error;
pub mod preprints;
pub mod uploads;

pub use self::config::ServerConfig;
pub use error::ApiError;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use openarc_core::store::RecordStore;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use uploads::UploadDir;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RecordStore> {
  pub store:   Arc<S>,
  pub uploads: Arc<UploadDir>,
  pub config:  Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the record service.
///
/// Record routes answer with or without the trailing slash.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let files = ServeDir::new(state.uploads.root());
  let body_limit = state.config.max_upload_bytes;

  Router::new()
    .route("/api/preprints",            get(preprints::list::<S>).post(preprints::create::<S>))
    .route("/api/preprints/",           get(preprints::list::<S>).post(preprints::create::<S>))
    .route("/api/preprints/{id}",       get(preprints::get_one::<S>))
    .route("/api/preprints/{id}/",      get(preprints::get_one::<S>))
    .route("/api/preprints/{id}/mint",  post(preprints::mint::<S>))
    .route("/api/preprints/{id}/mint/", post(preprints::mint::<S>))
    .nest_service("/api/files", files)
    .with_state(state)
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(CorsLayer::very_permissive())
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
