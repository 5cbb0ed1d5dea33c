use crate::error::ServiceError;
use crate::services::surveys::get::load_survey;
use crate::services::surveys::list::{list_surveys, ListQuery, DEFAULT_PAGE_SIZE};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::survey::{Survey, SurveyStatus};
use log::debug;
use rusqlite::Connection;

/// `GET /api/surveys/public?page&size`. A `status` parameter is ignored.
pub async fn list(query: web::Query<ListQuery>, storage: web::Data<Storage>) -> impl Responder {
    let query = query.into_inner();
    if query.status.is_some() {
        debug!("Public survey list ignores the status filter {:?}", query.status);
    }
    let (page, size) = (query.page, query.size.unwrap_or(DEFAULT_PAGE_SIZE));
    match storage
        .run(move |conn| list_surveys(conn, Some(SurveyStatus::Active), page, size))
        .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => e.error_response(),
    }
}

/// `GET /api/surveys/public/{survey_id}`.
pub async fn get(survey_id: web::Path<i64>, storage: web::Data<Storage>) -> impl Responder {
    let survey_id = survey_id.into_inner();
    match storage.run(move |conn| load_active_survey(conn, survey_id)).await {
        Ok(survey) => HttpResponse::Ok().json(survey),
        Err(e) => e.error_response(),
    }
}

/// Like `load_survey`, but a survey that is not `ACTIVE` is reported as missing.
pub fn load_active_survey(conn: &Connection, survey_id: i64) -> Result<Survey, ServiceError> {
    let survey = load_survey(conn, survey_id)?;
    if survey.status != SurveyStatus::Active {
        return Err(ServiceError::not_found("survey", survey_id));
    }
    Ok(survey)
}
