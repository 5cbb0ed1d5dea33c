//! # Response Ingestion
//!
//! Stores one respondent's answer set for a survey.
//!
//! ## Workflow:
//! 1.  **Respondent check**: name and email must be present and the email well formed.
//!     This is the only step that rejects the request for its content.
//! 2.  **Survey lookup**: an unknown survey aborts the whole submission.
//! 3.  **Client upsert**: the respondent is matched by email. An existing client has its
//!     name refreshed when it changed; otherwise a client is created with name and email only.
//! 4.  **Catalog**: the survey's questions and their options are loaded once.
//! 5.  **Answers**: every submitted answer is resolved against its question. Answers to
//!     unknown questions and blank answers are skipped, never failing the submission.
//!
//! All rows of one call share a generated submission id and are written in a single
//! `IMMEDIATE` transaction, so two first submissions for the same email cannot both insert.

use crate::error::ServiceError;
use crate::services::responses::resolve::{resolve, Resolution};
use crate::storage::client_answers::NewClientAnswer;
use crate::storage::{client_answers, clients, questions, surveys, Storage};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::model::question::Question;
use common::requests::{Respondent, SurveyResponseRequest};
use common::responses::SurveyResponseResult;
use log::{debug, info, warn};
use regex::Regex;
use rusqlite::{Connection, TransactionBehavior};
use std::collections::HashMap;
use std::sync::LazyLock;
use uuid::Uuid;

const SUCCESS_MESSAGE: &str = "Responses saved successfully";

/// Actix handler for `POST /api/responses`.
///
/// # Responses:
/// - `201 Created` with a `SurveyResponseResult`.
/// - `400 Bad Request` when the respondent is incomplete.
/// - `404 Not Found` when the survey does not exist.
pub async fn process(
    payload: web::Json<SurveyResponseRequest>,
    storage: web::Data<Storage>,
) -> impl Responder {
    let request = payload.into_inner();
    match storage.run(move |conn| ingest(conn, &request)).await {
        Ok(result) => HttpResponse::Created().json(result),
        Err(e) => e.error_response(),
    }
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

fn validate_respondent(respondent: &Respondent) -> Result<(), ServiceError> {
    let mut errors = Vec::new();
    if respondent.name.trim().is_empty() {
        errors.push("respondent name must not be blank".to_string());
    }
    let email = respondent.email.trim();
    if email.is_empty() {
        errors.push("respondent email must not be blank".to_string());
    } else if !EMAIL_RE.is_match(email) {
        errors.push(format!("respondent email {:?} is not a valid address", email));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(errors))
    }
}

/// Questions of a survey keyed by id, each with its options keyed by text.
struct Catalog {
    questions: HashMap<i64, (Question, HashMap<String, i64>)>,
}

impl Catalog {
    fn load(conn: &Connection, survey_id: i64) -> rusqlite::Result<Self> {
        let questions = questions::find_by_survey_ordered(conn, survey_id)?
            .into_iter()
            .map(|question| {
                let mut options = HashMap::with_capacity(question.options.len());
                for option in &question.options {
                    // Duplicate option texts resolve to the lowest order number.
                    options.entry(option.text.clone()).or_insert(option.id);
                }
                (question.id, (question, options))
            })
            .collect();
        Ok(Self { questions })
    }
}

/// Stores one answer set; see the module documentation for the workflow.
pub fn ingest(
    conn: &mut Connection,
    request: &SurveyResponseRequest,
) -> Result<SurveyResponseResult, ServiceError> {
    validate_respondent(&request.respondent)?;
    let name = request.respondent.name.trim();
    let email = request.respondent.email.trim();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let survey = surveys::find_by_id(&tx, request.survey_id)?
        .ok_or_else(|| ServiceError::not_found("survey", request.survey_id))?;

    let client_id = match clients::find_by_email(&tx, email)? {
        Some(client) => {
            if client.name != name {
                clients::update_name(&tx, client.id, name)?;
                info!("Client {} renamed from {:?} to {:?}", client.id, client.name, name);
            }
            client.id
        }
        None => {
            let id = clients::upsert_by_email(&tx, name, email)?;
            info!("Client {} created for {}", id, email);
            id
        }
    };

    let catalog = Catalog::load(&tx, survey.id)?;
    let submission_id = Uuid::new_v4().to_string();
    let mut stored = 0usize;

    for submitted in &request.answers {
        let Some((question, options)) = catalog.questions.get(&submitted.question_id) else {
            warn!(
                "Submission {}: question {} is not part of survey {}, skipped",
                submission_id, submitted.question_id, survey.id
            );
            continue;
        };
        let resolved = match resolve(question.question_type, submitted.answer.as_ref(), options) {
            Resolution::Skip => {
                debug!(
                    "Submission {}: blank answer to question {}, skipped",
                    submission_id, question.id
                );
                continue;
            }
            Resolution::Answer(resolved) => resolved,
        };
        if question.question_type.is_choice() && resolved.selected_option_id.is_none() {
            warn!(
                "Submission {}: answer {:?} matches no option of question {}",
                submission_id, resolved.text_answer, question.id
            );
        }

        client_answers::insert(
            &tx,
            &NewClientAnswer {
                client_id,
                survey_id: survey.id,
                question_id: question.id,
                answer_option_id: resolved.selected_option_id,
                submission_id: &submission_id,
                text_answer: resolved.text_answer.as_deref(),
                numeric_answer: resolved.numeric_answer,
                selections: &resolved.selections,
            },
        )?;
        stored += 1;
    }

    tx.commit()?;
    info!(
        "Submission {} for survey {} by client {}: {} of {} answers stored",
        submission_id,
        survey.id,
        client_id,
        stored,
        request.answers.len()
    );

    Ok(SurveyResponseResult {
        client_id,
        survey_id: survey.id,
        survey_title: survey.title,
        respondent_name: name.to_string(),
        respondent_email: email.to_string(),
        submission_id,
        answers_count: stored,
        submitted_at: Utc::now(),
        message: SUCCESS_MESSAGE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::surveys::create::create_survey;
    use crate::storage::{open_in_memory, users};
    use common::model::survey::Survey;
    use common::requests::SurveyDocument;
    use serde_json::json;

    fn setup() -> (Connection, Survey) {
        let mut conn = open_in_memory();
        users::ensure(&conn, "owner@example.com").unwrap();
        let document: SurveyDocument = serde_json::from_value(json!({
            "title": "Onboarding",
            "status": "ACTIVE",
            "questions": [
                { "text": "Plan", "type": "SINGLE_CHOICE", "required": true, "options": ["Basic", "Pro"] },
                { "text": "Channels", "type": "MULTIPLE_CHOICE", "required": false, "options": ["Email", "Phone"] },
                { "text": "Score", "type": "RATING", "required": false },
                { "text": "Notes", "type": "TEXT", "required": false }
            ]
        }))
        .unwrap();
        let survey = create_survey(&mut conn, &document, "owner@example.com").unwrap();
        (conn, survey)
    }

    fn request(survey: &Survey, name: &str, answers: serde_json::Value) -> SurveyResponseRequest {
        serde_json::from_value(json!({
            "surveyId": survey.id,
            "respondent": { "name": name, "email": "resp@example.com" },
            "answers": answers
        }))
        .unwrap()
    }

    #[test]
    fn answers_are_resolved_per_question_type() {
        let (mut conn, survey) = setup();
        let q = &survey.questions;
        let result = ingest(
            &mut conn,
            &request(
                &survey,
                "Rita",
                json!([
                    { "questionId": q[0].id, "answer": "Pro" },
                    { "questionId": q[1].id, "answer": ["Email", "Phone"] },
                    { "questionId": q[2].id, "answer": "7" },
                    { "questionId": q[3].id, "answer": "  ok " }
                ]),
            ),
        )
        .unwrap();
        assert_eq!(result.answers_count, 4);
        assert_eq!(result.survey_title, "Onboarding");

        let stored = client_answers::find_by_survey(&conn, survey.id).unwrap();
        assert_eq!(stored.len(), 4);
        assert!(stored.iter().all(|a| a.submission_id == result.submission_id));
        let by_question = |id: i64| stored.iter().find(|a| a.question_id == id).unwrap();
        assert_eq!(by_question(q[0].id).answer_option_id, Some(q[0].options[1].id));
        assert_eq!(by_question(q[1].id).answer_option_id, Some(q[1].options[0].id));
        assert_eq!(by_question(q[1].id).selections, vec!["Email", "Phone"]);
        assert_eq!(by_question(q[1].id).text_answer.as_deref(), Some("Email, Phone"));
        assert_eq!(by_question(q[2].id).numeric_answer, Some(7));
        assert_eq!(by_question(q[3].id).text_answer.as_deref(), Some("ok"));
    }

    #[test]
    fn unparsable_rating_is_stored_as_text() {
        let (mut conn, survey) = setup();
        let result = ingest(
            &mut conn,
            &request(&survey, "Rita", json!([{ "questionId": survey.questions[2].id, "answer": "high" }])),
        )
        .unwrap();
        assert_eq!(result.answers_count, 1);
        let stored = client_answers::find_by_survey(&conn, survey.id).unwrap();
        assert_eq!(stored[0].numeric_answer, None);
        assert_eq!(stored[0].text_answer.as_deref(), Some("high"));
    }

    #[test]
    fn unmatched_single_choice_is_kept_without_option() {
        let (mut conn, survey) = setup();
        ingest(
            &mut conn,
            &request(&survey, "Rita", json!([{ "questionId": survey.questions[0].id, "answer": "Enterprise" }])),
        )
        .unwrap();
        let stored = client_answers::find_by_survey(&conn, survey.id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].answer_option_id, None);
        assert_eq!(stored[0].text_answer.as_deref(), Some("Enterprise"));
    }

    #[test]
    fn unknown_questions_and_blank_answers_are_skipped() {
        let (mut conn, survey) = setup();
        let result = ingest(
            &mut conn,
            &request(
                &survey,
                "Rita",
                json!([
                    { "questionId": survey.questions[0].id, "answer": "Basic" },
                    { "questionId": 987654, "answer": "Basic" },
                    { "questionId": survey.questions[1].id, "answer": [] },
                    { "questionId": survey.questions[2].id }
                ]),
            ),
        )
        .unwrap();
        assert_eq!(result.answers_count, 1);
        assert_eq!(client_answers::count_by_survey(&conn, survey.id).unwrap(), 1);
    }

    #[test]
    fn question_of_another_survey_is_skipped() {
        let (mut conn, survey) = setup();
        let other: SurveyDocument = serde_json::from_value(json!({
            "title": "Other",
            "questions": [{ "text": "Elsewhere", "type": "TEXT", "required": false }]
        }))
        .unwrap();
        let other = create_survey(&mut conn, &other, "owner@example.com").unwrap();
        let foreign = other.questions[0].id;

        let result = ingest(
            &mut conn,
            &request(
                &survey,
                "Rita",
                json!([
                    { "questionId": survey.questions[3].id, "answer": "mine" },
                    { "questionId": foreign, "answer": "not mine" }
                ]),
            ),
        )
        .unwrap();
        assert_eq!(result.answers_count, 1);
        let referencing: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM client_answers WHERE question_id = ?1",
                [foreign],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(referencing, 0);
    }

    #[test]
    fn off_type_answer_does_not_reject_the_others() {
        let (mut conn, survey) = setup();
        let q = &survey.questions;
        let result = ingest(
            &mut conn,
            &request(
                &survey,
                "Rita",
                json!([
                    { "questionId": q[3].id, "answer": "good answer" },
                    { "questionId": q[1].id, "answer": [1, 2] },
                    { "questionId": q[0].id, "answer": true },
                    { "questionId": q[2].id, "answer": { "x": 1 } }
                ]),
            ),
        )
        .unwrap();
        assert_eq!(result.answers_count, 4);

        let stored = client_answers::find_by_survey(&conn, survey.id).unwrap();
        let by_question = |id: i64| stored.iter().find(|a| a.question_id == id).unwrap();
        assert_eq!(by_question(q[3].id).text_answer.as_deref(), Some("good answer"));
        assert_eq!(by_question(q[1].id).selections, vec!["1", "2"]);
        assert_eq!(by_question(q[0].id).text_answer.as_deref(), Some("true"));
        assert_eq!(by_question(q[0].id).answer_option_id, None);
        assert_eq!(by_question(q[2].id).numeric_answer, None);
    }

    #[test]
    fn same_email_twice_reuses_the_client() {
        let (mut conn, survey) = setup();
        let answers = json!([{ "questionId": survey.questions[3].id, "answer": "first" }]);
        let first = ingest(&mut conn, &request(&survey, "Rita", answers.clone())).unwrap();
        let second = ingest(&mut conn, &request(&survey, "Rita", answers)).unwrap();

        assert_eq!(first.client_id, second.client_id);
        assert_ne!(first.submission_id, second.submission_id);
        let clients: i64 = conn
            .query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(clients, 1);
        assert_eq!(client_answers::count_by_survey(&conn, survey.id).unwrap(), 2);
    }

    #[test]
    fn changed_name_is_refreshed() {
        let (mut conn, survey) = setup();
        ingest(&mut conn, &request(&survey, "Rita", json!([]))).unwrap();
        let result = ingest(&mut conn, &request(&survey, "Rita K.", json!([]))).unwrap();
        let client = clients::find_by_id(&conn, result.client_id).unwrap().unwrap();
        assert_eq!(client.name, "Rita K.");
    }

    #[test]
    fn unknown_survey_aborts() {
        let (mut conn, mut survey) = setup();
        survey.id += 100;
        let err = ingest(&mut conn, &request(&survey, "Rita", json!([]))).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        let clients: i64 = conn
            .query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(clients, 0);
    }

    #[test]
    fn incomplete_respondent_is_rejected() {
        let (mut conn, survey) = setup();
        let mut bad = request(&survey, " ", json!([]));
        bad.respondent.email = "not-an-email".into();
        match ingest(&mut conn, &bad) {
            Err(ServiceError::ValidationFailed(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected result: {:?}", other.map(|r| r.answers_count)),
        }
    }
}
