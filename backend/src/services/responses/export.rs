//! CSV export of every stored answer of a survey, one row per answer.

use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::services::responses::formatted::SurveyAnswers;
use crate::storage::Storage;
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use log::info;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    submission_id: &'a str,
    client_id: i64,
    respondent_email: &'a str,
    question_order: Option<u32>,
    question_text: &'a str,
    question_type: &'a str,
    answer_text: Option<&'a str>,
    numeric_answer: Option<i32>,
    option_id: Option<i64>,
}

/// Actix handler for `GET /api/responses/{survey_id}/export`.
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
        .run(move |conn| export_responses_csv(conn, survey_id))
        .await
    {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"survey-{}-responses.csv\"", survey_id),
            ))
            .body(bytes),
        Err(e) => e.error_response(),
    }
}

pub fn export_responses_csv(conn: &Connection, survey_id: i64) -> Result<Vec<u8>, ServiceError> {
    let answers = SurveyAnswers::load(conn, survey_id)?;
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rows = 0usize;
    for submission in &answers.submissions {
        for answer in &submission.answers {
            let question = answers.questions.get(&answer.question_id);
            writer.serialize(ExportRow {
                submission_id: &submission.submission_id,
                client_id: submission.client.id,
                respondent_email: &submission.client.email,
                question_order: question.map(|q| q.order_number),
                question_text: question.map_or("", |q| q.text.as_str()),
                question_type: question.map_or("", |q| q.question_type.as_str()),
                answer_text: answer.text_answer.as_deref(),
                numeric_answer: answer.numeric_answer,
                option_id: answer.answer_option_id,
            })?;
            rows += 1;
        }
    }
    if rows == 0 {
        // serialize() writes the header with the first row only.
        writer.write_record([
            "submission_id",
            "client_id",
            "respondent_email",
            "question_order",
            "question_text",
            "question_type",
            "answer_text",
            "numeric_answer",
            "option_id",
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    info!("Exported {} answers of survey {}", rows, survey_id);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::responses::fixtures::survey_with_answers;

    #[test]
    fn export_has_header_and_one_row_per_answer() {
        let (conn, survey) = survey_with_answers();
        let bytes = export_responses_csv(&conn, survey.id).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("submission_id"));
        assert_eq!(headers.get(8), Some("option_id"));

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 6);
        assert_eq!(&records[0][3], "1");
        assert_eq!(&records[0][4], "Sessions");
        assert_eq!(&records[0][6], "Workshops, labs, Keynote");
        assert_eq!(&records[1][7], "9");
    }

    #[test]
    fn empty_survey_exports_header_only() {
        let (conn, survey) = survey_with_answers();
        conn.execute("DELETE FROM client_answers", []).unwrap();
        let bytes = export_responses_csv(&conn, survey.id).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("submission_id,client_id,"));
    }
}
