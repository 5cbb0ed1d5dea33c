use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::storage::{client_answers, clients, questions, surveys, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::client::{Client, ClientAnswer};
use common::model::question::{Question, QuestionType};
use common::requests::AnswerValue;
use common::responses::{FormattedAnswer, FormattedResponse, RespondentInfo};
use rusqlite::Connection;
use std::collections::HashMap;

/// Actix handler for `GET /api/responses/{survey_id}`.
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
        .run(move |conn| formatted_responses(conn, survey_id))
        .await
    {
        Ok(responses) => HttpResponse::Ok().json(responses),
        Err(e) => e.error_response(),
    }
}

/// Answers of one submission together with the client who gave them.
pub(crate) struct Submission {
    pub submission_id: String,
    pub client: Client,
    pub answers: Vec<ClientAnswer>,
}

/// Everything stored for a survey, grouped by submission in the order the
/// submissions arrived. Answers inside a submission follow question order.
pub(crate) struct SurveyAnswers {
    pub questions: HashMap<i64, Question>,
    pub submissions: Vec<Submission>,
}

impl SurveyAnswers {
    pub(crate) fn load(conn: &Connection, survey_id: i64) -> Result<Self, ServiceError> {
        if surveys::find_by_id(conn, survey_id)?.is_none() {
            return Err(ServiceError::not_found("survey", survey_id));
        }
        let questions: HashMap<i64, Question> = questions::find_by_survey_ordered(conn, survey_id)?
            .into_iter()
            .map(|q| (q.id, q))
            .collect();

        let mut clients_by_id: HashMap<i64, Client> = HashMap::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut submissions: Vec<Submission> = Vec::new();
        for answer in client_answers::find_by_survey(conn, survey_id)? {
            let index = match positions.get(&answer.submission_id) {
                Some(index) => *index,
                None => {
                    let client = match clients_by_id.get(&answer.client_id) {
                        Some(client) => client.clone(),
                        None => {
                            let client = clients::find_by_id(conn, answer.client_id)?
                                .ok_or_else(|| ServiceError::not_found("client", answer.client_id))?;
                            clients_by_id.insert(client.id, client.clone());
                            client
                        }
                    };
                    positions.insert(answer.submission_id.clone(), submissions.len());
                    submissions.push(Submission {
                        submission_id: answer.submission_id.clone(),
                        client,
                        answers: Vec::new(),
                    });
                    submissions.len() - 1
                }
            };
            submissions[index].answers.push(answer);
        }

        for submission in &mut submissions {
            submission.answers.sort_by_key(|answer| {
                questions
                    .get(&answer.question_id)
                    .map_or(u32::MAX, |q| q.order_number)
            });
        }
        Ok(Self { questions, submissions })
    }
}

/// One entry per submission, answers rendered back into the submitted shape.
pub fn formatted_responses(
    conn: &Connection,
    survey_id: i64,
) -> Result<Vec<FormattedResponse>, ServiceError> {
    let SurveyAnswers { questions, submissions } = SurveyAnswers::load(conn, survey_id)?;
    let responses = submissions
        .into_iter()
        .filter_map(|submission| {
            let submitted_at = submission.answers.iter().map(|a| a.created_at).min()?;
            let answers = submission
                .answers
                .iter()
                .map(|answer| FormattedAnswer {
                    question_id: answer.question_id,
                    answer: render(questions.get(&answer.question_id), answer),
                })
                .collect();
            Some(FormattedResponse {
                submission_id: submission.submission_id,
                client_id: submission.client.id,
                survey_id,
                respondent: RespondentInfo {
                    name: submission.client.name,
                    email: submission.client.email,
                },
                answers,
                submitted_at,
            })
        })
        .collect();
    Ok(responses)
}

fn render(question: Option<&Question>, answer: &ClientAnswer) -> AnswerValue {
    let question_type = question.map(|q| q.question_type);
    if question_type == Some(QuestionType::MultipleChoice) && !answer.selections.is_empty() {
        return AnswerValue::List(answer.selections.clone());
    }
    if question_type == Some(QuestionType::Rating) {
        if let Some(numeric) = answer.numeric_answer {
            return AnswerValue::Number(numeric.into());
        }
        if let Some(number) = answer
            .text_answer
            .as_deref()
            .filter(|text| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
            .and_then(|text| text.parse::<u64>().ok())
        {
            return AnswerValue::Number(number.into());
        }
    }
    if let Some(text) = &answer.text_answer {
        return AnswerValue::Text(text.clone());
    }
    let option_text = question.zip(answer.answer_option_id).and_then(|(q, option_id)| {
        q.options
            .iter()
            .find(|option| option.id == option_id)
            .map(|option| option.text.clone())
    });
    AnswerValue::Text(option_text.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::responses::fixtures::survey_with_answers;
    use crate::services::surveys::create::create_survey;
    use crate::storage::{open_in_memory, users};
    use common::requests::SurveyDocument;
    use serde_json::json;

    #[test]
    fn responses_are_grouped_by_submission_in_question_order() {
        let (conn, survey) = survey_with_answers();
        let responses = formatted_responses(&conn, survey.id).unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].respondent.email, "a@example.com");

        let first = &responses[0];
        let ids: Vec<i64> = first.answers.iter().map(|a| a.question_id).collect();
        let expected: Vec<i64> = survey.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(
            first.answers[0].answer,
            AnswerValue::List(vec!["Workshops, labs".into(), "Keynote".into()])
        );
        assert_eq!(first.answers[1].answer, AnswerValue::Number(9.into()));
        assert_eq!(first.answers[2].answer, AnswerValue::Text("fine".into()));
        assert_eq!(responses[1].answers[1].answer, AnswerValue::Text("great".into()));
    }

    #[test]
    fn survey_without_answers_yields_empty_list() {
        let mut conn = open_in_memory();
        users::ensure(&conn, "owner@example.com").unwrap();
        let document: SurveyDocument = serde_json::from_value(json!({
            "title": "Quiet",
            "questions": [{ "text": "Anything?", "type": "TEXT", "required": false }]
        }))
        .unwrap();
        let survey = create_survey(&mut conn, &document, "owner@example.com").unwrap();
        assert!(formatted_responses(&conn, survey.id).unwrap().is_empty());
        assert!(matches!(
            formatted_responses(&conn, survey.id + 1),
            Err(ServiceError::NotFound { .. })
        ));
    }
}
