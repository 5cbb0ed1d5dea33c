use super::options::reconcile_options;
use crate::error::ServiceError;
use crate::services::surveys::validate::parse_question_type;
use crate::storage::questions;
use common::model::question::Question;
use common::requests::QuestionDocument;
use log::debug;
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};

/// Aligns the questions of `survey_id` with `submitted` and returns the new
/// ordered question list.
///
/// - Existing questions whose id is not submitted are deleted first, together
///   with their options and answers.
/// - Submitted questions are numbered 1..N in submission order. One carrying an
///   id is updated in place, one without an id is created.
/// - An id that is not among `existing` (including ids of other surveys) fails
///   with `NotFound`; a bad type string fails with `ValidationFailed`. Either way
///   the caller's transaction must be rolled back.
pub fn reconcile_questions(
    conn: &Connection,
    survey_id: i64,
    existing: Vec<Question>,
    submitted: &[QuestionDocument],
) -> Result<Vec<Question>, ServiceError> {
    let types = submitted
        .iter()
        .map(|q| parse_question_type(&q.question_type))
        .collect::<Result<Vec<_>, _>>()?;

    let mut submitted_ids = HashSet::new();
    for id in submitted.iter().filter_map(|q| q.id) {
        if !submitted_ids.insert(id) {
            return Err(ServiceError::invalid(format!(
                "question {} is submitted more than once",
                id
            )));
        }
    }

    let (kept, removed): (Vec<Question>, Vec<Question>) = existing
        .into_iter()
        .partition(|q| submitted_ids.contains(&q.id));

    for question in &removed {
        questions::delete(conn, question.id)?;
    }
    if !removed.is_empty() {
        debug!(
            "Survey {}: deleted questions {:?}",
            survey_id,
            removed.iter().map(|q| q.id).collect::<Vec<_>>()
        );
    }

    let mut kept: HashMap<i64, Question> = kept.into_iter().map(|q| (q.id, q)).collect();
    let mut result = Vec::with_capacity(submitted.len());

    for (index, (document, question_type)) in submitted.iter().zip(types).enumerate() {
        let order_number = index as u32 + 1;
        let new_texts = document.options.as_deref().unwrap_or(&[]);

        let question = match document.id {
            Some(id) => {
                let mut question = kept
                    .remove(&id)
                    .ok_or_else(|| ServiceError::not_found("question", id))?;
                question.text = document.text.clone();
                question.question_type = question_type;
                question.required = document.required;
                question.order_number = order_number;
                questions::update(conn, &question)?;

                let previous = std::mem::take(&mut question.options);
                question.options = reconcile_options(conn, question.id, &previous, new_texts)?;
                debug!("Survey {}: updated question {} at position {}", survey_id, id, order_number);
                question
            }
            None => {
                let id = questions::insert(
                    conn,
                    survey_id,
                    &document.text,
                    question_type,
                    document.required,
                    order_number,
                )?;
                let options = reconcile_options(conn, id, &[], new_texts)?;
                debug!("Survey {}: created question {} at position {}", survey_id, id, order_number);
                Question {
                    id,
                    survey_id,
                    text: document.text.clone(),
                    question_type,
                    required: document.required,
                    order_number,
                    options,
                }
            }
        };
        result.push(question);
    }

    Ok(result)
}
