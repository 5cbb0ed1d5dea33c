//! Caller identity for editor routes and the logout endpoint.

pub mod identity;
pub mod logout;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/logout", post().to(logout::process))
}
