//! # Survey Service Module
//!
//! Routes every request under `/api/surveys` to its handler and hosts the
//! survey-definition engine.
//!
//! ## Sub-modules:
//! - `create`, `get`, `list`, `update`, `status`, `delete`: one operation each.
//! - `validate`: structural checks and strict enum parsing for submitted documents.
//! - `reconcile`: aligns the stored question/option tree with a submitted one.

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod reconcile;
pub mod status;
pub mod update;
pub mod validate;

use actix_web::web::{delete, get, patch, post, put, scope};
use actix_web::Scope;

/// The base path for all survey-definition endpoints.
const API_PATH: &str = "/api/surveys";

/// Configures and returns the Actix `Scope` for survey definitions.
///
/// # Registered Routes:
///
/// *   **`POST /`** → `create::process`: creates a survey owned by the caller.
/// *   **`GET /`** → `list::process`: pages through surveys, optionally by status.
/// *   **`GET /{survey_id}`** → `get::process`: one fully materialized survey.
/// *   **`PUT /{survey_id}`** → `update::process`: replaces the survey definition,
///     reconciling questions and options. Owner only.
/// *   **`PATCH /{survey_id}/status`** → `status::process`: changes only the status.
/// *   **`DELETE /{survey_id}`** → `delete::process`: hard delete. Owner only.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/{survey_id}", get().to(get::process))
        .route("/{survey_id}", put().to(update::process))
        .route("/{survey_id}", delete().to(delete::process))
        .route("/{survey_id}/status", patch().to(status::process))
}
