use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::storage::{surveys, users, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use log::info;
use rusqlite::Connection;

/// Actix handler for `DELETE /api/surveys/{survey_id}`.
pub async fn process(
    req: HttpRequest,
    survey_id: web::Path<i64>,
    storage: web::Data<Storage>,
    blacklist: web::Data<TokenBlacklist>,
) -> impl Responder {
    let editor = match editor_email(&req, &blacklist).await {
        Ok(email) => email,
        Err(e) => return e.error_response(),
    };
    let survey_id = survey_id.into_inner();
    match storage
        .run(move |conn| delete_survey(conn, survey_id, &editor))
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.error_response(),
    }
}

/// Hard-deletes a survey owned by `editor_email`. Questions, options and every
/// answer given to the survey are removed with it.
pub fn delete_survey(conn: &mut Connection, survey_id: i64, editor_email: &str) -> Result<(), ServiceError> {
    let tx = conn.transaction()?;
    let record = surveys::find_by_id(&tx, survey_id)?
        .ok_or_else(|| ServiceError::not_found("survey", survey_id))?;
    let editor = users::find_by_email(&tx, editor_email)?
        .ok_or_else(|| ServiceError::not_found("user", editor_email))?;
    if record.created_by != editor.id {
        return Err(ServiceError::AccessDenied(format!(
            "{} is not the owner of survey {}",
            editor.email, survey_id
        )));
    }
    surveys::delete(&tx, survey_id)?;
    tx.commit()?;
    info!("Survey {} deleted by {}", survey_id, editor.email);
    Ok(())
}
