pub mod auth;
pub mod clients;
pub mod public;
pub mod responses;
pub mod surveys;

use actix_web::web;

/// Registers every API scope on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(public::configure_routes())
        .service(surveys::configure_routes())
        .service(responses::configure_routes())
        .service(clients::configure_routes())
        .service(auth::configure_routes());
}
