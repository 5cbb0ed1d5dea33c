//! Unauthenticated read access for respondents.
//!
//! Only `ACTIVE` surveys are visible here: drafts and completed surveys answer
//! `404` on the single-survey route and never appear in the list.

pub mod surveys;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/surveys/public";

/// Must be registered before `services::surveys::configure_routes()`, whose
/// `/{survey_id}` route would otherwise claim `/public`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(surveys::list))
        .route("/{survey_id}", get().to(surveys::get))
}
