use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::services::surveys::get::load_survey;
use crate::services::surveys::validate::parse_status;
use crate::storage::{surveys, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::survey::Survey;
use common::requests::StatusUpdateRequest;
use log::info;
use rusqlite::Connection;

/// Actix handler for `PATCH /api/surveys/{survey_id}/status`.
///
/// Any authenticated editor may change the status; `401` otherwise.
pub async fn process(
    req: HttpRequest,
    survey_id: web::Path<i64>,
    payload: web::Json<StatusUpdateRequest>,
    storage: web::Data<Storage>,
    blacklist: web::Data<TokenBlacklist>,
) -> impl Responder {
    let editor = match editor_email(&req, &blacklist).await {
        Ok(email) => email,
        Err(e) => return e.error_response(),
    };
    let survey_id = survey_id.into_inner();
    let request = payload.into_inner();
    match storage
        .run(move |conn| {
            let survey = update_status(conn, survey_id, &request.status)?;
            info!("Status of survey {} changed by {}", survey_id, editor);
            Ok(survey)
        })
        .await
    {
        Ok(survey) => HttpResponse::Ok().json(survey),
        Err(e) => e.error_response(),
    }
}

/// Changes only the status of a survey; the status string must parse.
pub fn update_status(conn: &Connection, survey_id: i64, raw_status: &str) -> Result<Survey, ServiceError> {
    let status = parse_status(Some(raw_status))?;
    if surveys::update_status(conn, survey_id, status)? == 0 {
        return Err(ServiceError::not_found("survey", survey_id));
    }
    info!("Survey {} status set to {}", survey_id, status);
    load_survey(conn, survey_id)
}
