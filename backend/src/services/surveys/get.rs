use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::storage::surveys::SurveyRecord;
use crate::storage::{questions, surveys, users, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::survey::Survey;
use rusqlite::Connection;

/// Actix handler for `GET /api/surveys/{survey_id}`.
pub async fn process(
    req: HttpRequest,
    survey_id: web::Path<i64>,
    storage: web::Data<Storage>,
    blacklist: web::Data<TokenBlacklist>,
) -> impl Responder {
    if let Err(e) = editor_email(&req, &blacklist).await {
        return e.error_response();
    }
    let survey_id = survey_id.into_inner();
    match storage.run(move |conn| load_survey(conn, survey_id)).await {
        Ok(survey) => HttpResponse::Ok().json(survey),
        Err(e) => e.error_response(),
    }
}

/// Loads a survey with its owner and its ordered question tree.
pub fn load_survey(conn: &Connection, survey_id: i64) -> Result<Survey, ServiceError> {
    let record = surveys::find_by_id(conn, survey_id)?
        .ok_or_else(|| ServiceError::not_found("survey", survey_id))?;
    materialize(conn, record)
}

pub(crate) fn materialize(conn: &Connection, record: SurveyRecord) -> Result<Survey, ServiceError> {
    let owner = users::find_by_id(conn, record.created_by)?
        .ok_or_else(|| ServiceError::not_found("user", record.created_by))?;
    let questions = questions::find_by_survey_ordered(conn, record.id)?;
    Ok(Survey {
        id: record.id,
        title: record.title,
        description: record.description,
        status: record.status,
        start_date: record.start_date,
        end_date: record.end_date,
        owner,
        questions,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}
