use crate::error::ServiceError;
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::http::header;
use actix_web::HttpRequest;

/// Header naming the editor on behalf of whom a request is made.
pub const EDITOR_HEADER: &str = "X-User-Email";

/// The bearer token from the `Authorization` header, if one is present.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Resolves the editor email of an authenticated request.
///
/// A revoked bearer token or a missing `X-User-Email` header yields
/// `Unauthorized`. Whether the email names a known user is left to the caller.
pub async fn editor_email(
    req: &HttpRequest,
    blacklist: &TokenBlacklist,
) -> Result<String, ServiceError> {
    if let Some(token) = bearer_token(req) {
        if blacklist.is_revoked(&token).await {
            return Err(ServiceError::Unauthorized("token has been revoked".into()));
        }
    }
    req.headers()
        .get(EDITOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Unauthorized(format!("missing {} header", EDITOR_HEADER)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::{Duration, Utc};

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer   "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[actix_web::test]
    async fn editor_email_is_trimmed() {
        let req = TestRequest::default()
            .insert_header((EDITOR_HEADER, "  editor@example.com "))
            .to_http_request();
        let email = editor_email(&req, &TokenBlacklist::new()).await.unwrap();
        assert_eq!(email, "editor@example.com");
    }

    #[actix_web::test]
    async fn revoked_token_wins_over_header() {
        let blacklist = TokenBlacklist::new();
        blacklist.revoke("t1", Utc::now() + Duration::minutes(5)).await;
        let req = TestRequest::default()
            .insert_header((EDITOR_HEADER, "editor@example.com"))
            .insert_header(("Authorization", "Bearer t1"))
            .to_http_request();
        assert!(matches!(
            editor_email(&req, &blacklist).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn blank_header_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((EDITOR_HEADER, "   "))
            .to_http_request();
        assert!(editor_email(&req, &TokenBlacklist::new()).await.is_err());
    }
}
