//! Respondent reports.

pub mod with_answers;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/clients";

/// *   **`GET /with-answers`** → `with_answers::process`: every client with its answers.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/with-answers", get().to(with_answers::process))
}
