use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::storage::client_answers::LabeledAnswer;
use crate::storage::{client_answers, clients, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::responses::{ClientAnswerEntry, ClientWithAnswers};
use log::info;
use rusqlite::Connection;
use std::collections::HashMap;

/// Actix handler for `GET /api/clients/with-answers`. Editors only.
pub async fn process(
    req: HttpRequest,
    storage: web::Data<Storage>,
    blacklist: web::Data<TokenBlacklist>,
) -> impl Responder {
    if let Err(e) = editor_email(&req, &blacklist).await {
        return e.error_response();
    }
    match storage.run(|conn| clients_with_answers(conn)).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => e.error_response(),
    }
}

/// Every client, oldest first, each with all of its answers across surveys.
/// Clients that never answered anything are listed with an empty answer list.
pub fn clients_with_answers(conn: &Connection) -> Result<Vec<ClientWithAnswers>, ServiceError> {
    let mut answers: HashMap<i64, Vec<ClientAnswerEntry>> = HashMap::new();
    for labeled in client_answers::find_all_labeled(conn)? {
        answers
            .entry(labeled.answer.client_id)
            .or_default()
            .push(entry(labeled));
    }

    let report: Vec<ClientWithAnswers> = clients::find_all(conn)?
        .into_iter()
        .map(|client| ClientWithAnswers {
            answers: answers.remove(&client.id).unwrap_or_default(),
            id: client.id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            gender: client.gender,
            age_group: client.age_group,
            profession: client.profession,
            region: client.region,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
        .collect();
    info!("Clients report: {} clients", report.len());
    Ok(report)
}

fn entry(labeled: LabeledAnswer) -> ClientAnswerEntry {
    let LabeledAnswer {
        answer,
        question_text,
        option_text,
    } = labeled;
    // A multiple-choice answer names only its first selection's option.
    let option_text = option_text.filter(|_| answer.selections.len() <= 1);
    let text = option_text
        .or(answer.text_answer)
        .or_else(|| answer.numeric_answer.map(|n| n.to_string()));
    ClientAnswerEntry {
        id: answer.id,
        survey_id: answer.survey_id,
        question_id: answer.question_id,
        question_text,
        submission_id: answer.submission_id,
        answer: text,
        answered_at: answer.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::responses::fixtures::survey_with_answers;

    #[test]
    fn every_client_is_listed_with_its_answers() {
        let (conn, survey) = survey_with_answers();
        clients::upsert_by_email(&conn, "Silent", "silent@example.com").unwrap();
        conn.execute(
            "UPDATE clients SET region = 'North' WHERE email = 'a@example.com'",
            [],
        )
        .unwrap();

        let report = clients_with_answers(&conn).unwrap();
        assert_eq!(report.len(), 3);

        let first = &report[0];
        assert_eq!(first.email, "a@example.com");
        assert_eq!(first.region.as_deref(), Some("North"));
        assert_eq!(first.answers.len(), 3);
        assert!(first.answers.iter().all(|a| a.survey_id == survey.id));

        let by_text = |text: &str| {
            first
                .answers
                .iter()
                .find(|a| a.question_text == text)
                .and_then(|a| a.answer.clone())
        };
        assert_eq!(by_text("Sessions").as_deref(), Some("Workshops, labs, Keynote"));
        assert_eq!(by_text("Rating").as_deref(), Some("9"));
        assert_eq!(by_text("Comment").as_deref(), Some("fine"));

        assert!(report[2].answers.is_empty());
    }

    #[test]
    fn single_choice_answer_shows_the_option_text() {
        let (conn, survey) = survey_with_answers();
        let option = &survey.questions[0].options[0];
        conn.execute(
            "UPDATE client_answers SET selections = '[\"Keynote\"]', text_answer = NULL,
                 answer_option_id = ?1
             WHERE question_id = ?2",
            rusqlite::params![option.id, survey.questions[0].id],
        )
        .unwrap();
        let report = clients_with_answers(&conn).unwrap();
        let answer = report[0]
            .answers
            .iter()
            .find(|a| a.question_id == survey.questions[0].id)
            .unwrap();
        assert_eq!(answer.answer.as_deref(), Some("Keynote"));
    }
}
