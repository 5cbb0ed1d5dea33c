//! # Response Service Module
//!
//! Ingestion of respondent answer sets and the reports built from them.
//!
//! ## Sub-modules:
//! - `resolve`: turns a raw answer into its stored columns, by question type.
//! - `submit`: the ingestion pipeline behind `POST /api/responses`.
//! - `formatted`, `summary`, `export`: read-only reports for one survey.

pub mod export;
pub mod formatted;
pub mod resolve;
pub mod submit;
pub mod summary;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/responses";

/// Configures and returns the Actix `Scope` for responses.
///
/// # Registered Routes:
///
/// *   **`POST /`** → `submit::process`
/// *   **`GET /{survey_id}`** → `formatted::process`
/// *   **`GET /{survey_id}/summary`** → `summary::process`
/// *   **`GET /{survey_id}/export`** → `export::process`: CSV download.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(submit::process))
        .route("/{survey_id}", get().to(formatted::process))
        .route("/{survey_id}/summary", get().to(summary::process))
        .route("/{survey_id}/export", get().to(export::process))
}
