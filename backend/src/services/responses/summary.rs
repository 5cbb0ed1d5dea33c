use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::storage::{client_answers, surveys, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::responses::ResponsesSummary;
use rusqlite::Connection;

/// Actix handler for `GET /api/responses/{survey_id}/summary`.
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
    match storage
        .run(move |conn| responses_summary(conn, survey_id))
        .await
    {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => e.error_response(),
    }
}

/// Counts of respondents and stored answers for one survey.
pub fn responses_summary(conn: &Connection, survey_id: i64) -> Result<ResponsesSummary, ServiceError> {
    if surveys::find_by_id(conn, survey_id)?.is_none() {
        return Err(ServiceError::not_found("survey", survey_id));
    }
    let respondent_ids = client_answers::distinct_client_ids(conn, survey_id)?;
    Ok(ResponsesSummary {
        survey_id,
        respondents_count: respondent_ids.len(),
        total_answers_count: client_answers::count_by_survey(conn, survey_id)?,
        respondent_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::responses::fixtures::survey_with_answers;

    #[test]
    fn summary_counts_respondents_and_answers() {
        let (conn, survey) = survey_with_answers();
        let summary = responses_summary(&conn, survey.id).unwrap();
        assert_eq!(summary.respondents_count, 2);
        assert_eq!(summary.total_answers_count, 6);
        assert_eq!(summary.respondent_ids.len(), 2);
    }
}
