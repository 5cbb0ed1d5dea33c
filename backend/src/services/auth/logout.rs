use crate::config::Config;
use crate::error::ServiceError;
use crate::services::auth::identity::bearer_token;
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use log::info;

/// Actix handler for `POST /api/auth/logout`.
///
/// Revokes the bearer token of the request until the configured TTL elapses.
/// Responds `204 No Content`, or `401` when no bearer token is present.
pub async fn process(
    req: HttpRequest,
    blacklist: web::Data<TokenBlacklist>,
    config: web::Data<Config>,
) -> impl Responder {
    let Some(token) = bearer_token(&req) else {
        return ServiceError::Unauthorized("missing bearer token".into()).error_response();
    };
    let ttl = chrono::Duration::from_std(config.token_ttl).unwrap_or(chrono::Duration::MAX);
    let expires_at = Utc::now()
        .checked_add_signed(ttl)
        .unwrap_or(chrono::DateTime::<Utc>::MAX_UTC);
    blacklist.revoke(token, expires_at).await;
    info!("Token revoked until {}", expires_at);
    HttpResponse::NoContent().finish()
}
